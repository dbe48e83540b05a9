//! Multi-intersection coordinator.
//!
//! Presents N single-intersection controllers as one agent-environment
//! interface with a joint observation/action space, while all N share
//! exactly one running simulation. Coordination is emergent, not
//! engineered: each agent only ever sees its own approaches, no messages
//! pass between agents, and the simulation advances once per joint step
//! after every agent's phase decision has been resolved.

use super::config::EnvConfig;
use super::error::EnvError;
use super::intersection::IntersectionController;
use super::observation::ObservationBuilder;
use super::types::{Action, StepInfo};
use crate::scenario::Scenario;
use crate::sim::{RoadNetwork, TrafficSim};

/// How per-agent rewards are folded into the scalar `reward` field, for
/// training algorithms that require one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RewardAggregation {
    #[default]
    Sum,
    Mean,
}

impl RewardAggregation {
    fn fold(&self, rewards: &[f64]) -> f64 {
        let sum: f64 = rewards.iter().sum();
        match self {
            RewardAggregation::Sum => sum,
            RewardAggregation::Mean => {
                if rewards.is_empty() {
                    0.0
                } else {
                    sum / rewards.len() as f64
                }
            }
        }
    }
}

/// Result of one coordinated step.
#[derive(Debug, Clone)]
pub struct NetworkStepResult {
    /// Joint observation: ordered concatenation of all per-agent vectors.
    pub observations: Vec<f64>,
    /// One reward per agent, in agent order. Rewards are never pooled.
    pub rewards: Vec<f64>,
    /// The per-agent rewards folded per [`RewardAggregation`].
    pub reward: f64,
    /// Shared episode boundary; global, not per-agent.
    pub done: bool,
    /// Current tick counter.
    pub tick: u32,
    /// Per-agent auxiliary metrics, in agent order.
    pub infos: Vec<StepInfo>,
}

/// Joint agent-environment interface over a network of intersections.
///
/// For the 3x3 grid: 45-float observation, 9-way joint binary action.
#[derive(Debug)]
pub struct MultiIntersectionEnv<S: TrafficSim> {
    sim: S,
    controllers: Vec<IntersectionController>,
    scenario: Scenario,
    aggregation: RewardAggregation,
    tick: u32,
}

impl<S: TrafficSim> MultiIntersectionEnv<S> {
    /// Creates a coordinator over every intersection in `network`, in the
    /// network's fixed agent order.
    pub fn new(sim: S, network: &RoadNetwork, scenario: Scenario, config: EnvConfig) -> Self {
        let controllers = network
            .intersection_ids()
            .iter()
            .map(|id| IntersectionController::new(id.clone(), config.clone()))
            .collect();
        Self {
            sim,
            controllers,
            scenario,
            aggregation: RewardAggregation::default(),
            tick: 0,
        }
    }

    /// Sets how the scalar reward is derived from per-agent rewards.
    pub fn with_aggregation(mut self, aggregation: RewardAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Number of coordinated agents.
    pub fn n_agents(&self) -> usize {
        self.controllers.len()
    }

    /// Length of the joint observation vector.
    pub fn joint_observation_dim(&self) -> usize {
        EnvConfig::joint_observation_dim(self.n_agents())
    }

    /// Resets the shared simulation exactly once, then each agent's local
    /// bookkeeping, and returns the joint initial observation.
    pub fn reset(&mut self) -> Result<Vec<f64>, EnvError> {
        self.sim.reset(&self.scenario)?;
        self.tick = 0;
        let mut joint = Vec::with_capacity(self.joint_observation_dim());
        for controller in &mut self.controllers {
            controller.reset_local(&mut self.sim)?;
            joint.extend(controller.observe(&mut self.sim)?);
        }
        Ok(joint)
    }

    /// Executes one joint action.
    ///
    /// All N phase decisions are resolved in agent order before the single
    /// shared simulation advance. A query failure at one intersection is
    /// isolated to that agent's observation and reward for the tick; errors
    /// from the shared advance stay fatal.
    pub fn step(&mut self, actions: &[Action]) -> Result<NetworkStepResult, EnvError> {
        if actions.len() != self.controllers.len() {
            return Err(EnvError::DimensionMismatch {
                expected: self.controllers.len(),
                actual: actions.len(),
            });
        }

        for (controller, action) in self.controllers.iter_mut().zip(actions) {
            controller.apply_action(&mut self.sim, *action)?;
        }

        self.sim.advance_tick()?;
        self.tick += 1;

        let mut observations = Vec::with_capacity(self.joint_observation_dim());
        let mut rewards = Vec::with_capacity(self.controllers.len());
        let mut infos = Vec::with_capacity(self.controllers.len());

        for controller in &mut self.controllers {
            match controller.observe_and_reward(&mut self.sim) {
                Ok((obs, reward, info)) => {
                    observations.extend(obs);
                    rewards.push(reward);
                    infos.push(info);
                }
                Err(err) => {
                    log::warn!(
                        "query failed at {} on tick {}: {}; zeroing this agent's slot",
                        controller.id(),
                        self.tick,
                        err
                    );
                    observations.extend(ObservationBuilder::zeros());
                    rewards.push(0.0);
                    infos.push(StepInfo {
                        anomalies: 1,
                        ..StepInfo::default()
                    });
                }
            }
        }

        let done =
            self.tick >= self.scenario.episode_ticks || self.sim.expected_vehicles()? == 0;
        let reward = self.aggregation.fold(&rewards);

        Ok(NetworkStepResult {
            observations,
            rewards,
            reward,
            done,
            tick: self.tick,
            infos,
        })
    }

    /// [`step`](Self::step) for integer-encoded joint actions. Every value
    /// is validated before any state is mutated.
    pub fn step_indices(&mut self, actions: &[usize]) -> Result<NetworkStepResult, EnvError> {
        if actions.len() != self.controllers.len() {
            return Err(EnvError::DimensionMismatch {
                expected: self.controllers.len(),
                actual: actions.len(),
            });
        }
        let typed: Vec<Action> = actions
            .iter()
            .map(|a| Action::try_from(*a))
            .collect::<Result<_, _>>()?;
        self.step(&typed)
    }

    /// Current tick counter.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// The underlying shared simulator (mainly for inspection in tests).
    pub fn sim(&self) -> &S {
        &self.sim
    }
}
