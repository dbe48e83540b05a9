//! Single-intersection environment.
//!
//! Converts one simulation tick into a standard agent-environment
//! interaction for one intersection: observe, act, reward, next observation.
//!
//! # Lifecycle
//!
//! 1. Construct with a simulator, a scenario, and an [`EnvConfig`].
//! 2. Call [`SingleIntersectionEnv::reset`] to start an episode.
//! 3. Repeatedly call [`SingleIntersectionEnv::step`] until `done`.

use super::config::EnvConfig;
use super::error::EnvError;
use super::intersection::IntersectionController;
use super::types::{Action, StepInfo};
use crate::scenario::Scenario;
use crate::sim::TrafficSim;
use crate::Id;

/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Observation after the step (length [`EnvConfig::OBS_DIM`]).
    pub observation: Vec<f64>,
    /// Reward for the transition.
    pub reward: f64,
    /// Whether the episode has ended.
    pub done: bool,
    /// Current tick counter.
    pub tick: u32,
    /// Auxiliary metrics for reporting; never policy input.
    pub info: StepInfo,
}

/// Agent-environment interface for one controlled intersection.
///
/// Observation space: 5 floats; action space: 2-way discrete.
#[derive(Debug)]
pub struct SingleIntersectionEnv<S: TrafficSim> {
    sim: S,
    controller: IntersectionController,
    scenario: Scenario,
    tick: u32,
}

impl<S: TrafficSim> SingleIntersectionEnv<S> {
    /// Creates an environment controlling intersection `tl_00`.
    pub fn new(sim: S, scenario: Scenario, config: EnvConfig) -> Self {
        Self::with_intersection(sim, scenario, config, "tl_00")
    }

    /// Creates an environment controlling a named intersection.
    pub fn with_intersection(
        sim: S,
        scenario: Scenario,
        config: EnvConfig,
        intersection: impl Into<Id>,
    ) -> Self {
        Self {
            sim,
            controller: IntersectionController::new(intersection, config),
            scenario,
            tick: 0,
        }
    }

    /// Restarts the simulation for a fresh episode and returns the initial
    /// observation. Callable repeatedly; the only way to clear accumulated
    /// phase state and the reward baseline.
    pub fn reset(&mut self) -> Result<Vec<f64>, EnvError> {
        self.sim.reset(&self.scenario)?;
        self.controller.reset_local(&mut self.sim)?;
        self.tick = 0;
        self.controller.observe(&mut self.sim)
    }

    /// Executes one action and advances the simulation by exactly one tick.
    pub fn step(&mut self, action: Action) -> Result<StepResult, EnvError> {
        self.controller.apply_action(&mut self.sim, action)?;
        self.sim.advance_tick()?;
        self.tick += 1;

        let (observation, reward, info) = self.controller.observe_and_reward(&mut self.sim)?;
        let done =
            self.tick >= self.scenario.episode_ticks || self.sim.expected_vehicles()? == 0;

        Ok(StepResult {
            observation,
            reward,
            done,
            tick: self.tick,
            info,
        })
    }

    /// [`step`](Self::step) for integer-emitting policies; undefined values
    /// fail with [`EnvError::InvalidAction`].
    pub fn step_index(&mut self, action: usize) -> Result<StepResult, EnvError> {
        self.step(Action::try_from(action)?)
    }

    /// Current tick counter.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// The scenario this environment was built with.
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// The underlying simulator (mainly for inspection in tests).
    pub fn sim(&self) -> &S {
        &self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ApproachQuery, Direction, PhaseId, SimError, SyntheticSim};

    fn make_env() -> SingleIntersectionEnv<SyntheticSim> {
        SingleIntersectionEnv::new(
            SyntheticSim::single_intersection(42),
            Scenario::balanced(),
            EnvConfig::default(),
        )
    }

    #[test]
    fn reset_returns_initial_observation() {
        let mut env = make_env();
        let obs = env.reset().unwrap();
        assert_eq!(obs.len(), EnvConfig::OBS_DIM);
        assert_eq!(obs[4], 0.0); // NS green after reset
        assert_eq!(env.tick(), 0);
    }

    #[test]
    fn reset_is_repeatable() {
        let mut env = make_env();
        env.reset().unwrap();
        for _ in 0..5 {
            env.step(Action::Hold).unwrap();
        }
        let obs = env.reset().unwrap();
        assert_eq!(obs.len(), EnvConfig::OBS_DIM);
        assert_eq!(env.tick(), 0);
    }

    #[test]
    fn step_advances_tick_and_returns_bounded_observation() {
        let mut env = make_env();
        env.reset().unwrap();
        let result = env.step(Action::Hold).unwrap();
        assert_eq!(result.tick, 1);
        assert!(!result.done);
        assert_eq!(result.observation.len(), EnvConfig::OBS_DIM);
        assert!(result.observation[0] <= 50.0);
        assert!(result.observation[1] <= 50.0);
        assert!(result.observation[2] == 0.0 || result.observation[2] == 1.0);
        assert!(result.observation[3] == 0.0 || result.observation[3] == 1.0);
    }

    #[test]
    fn step_index_rejects_undefined_actions() {
        let mut env = make_env();
        env.reset().unwrap();
        assert_eq!(env.step_index(3).unwrap_err(), EnvError::InvalidAction(3));
        // Valid encodings still work.
        assert!(env.step_index(0).is_ok());
        assert!(env.step_index(1).is_ok());
    }

    #[test]
    fn episode_ends_at_horizon() {
        let mut env = SingleIntersectionEnv::new(
            SyntheticSim::single_intersection(7),
            Scenario::balanced().with_episode_ticks(20),
            EnvConfig::default(),
        );
        env.reset().unwrap();
        let mut done = false;
        for t in 1..=20 {
            let result = env.step(Action::Hold).unwrap();
            done = result.done;
            if t < 20 {
                assert!(!done);
            }
        }
        assert!(done);
    }

    #[test]
    fn early_switch_leaves_phase_unchanged_next_tick() {
        let mut env = make_env();
        env.reset().unwrap();
        let before = env.step(Action::Hold).unwrap().observation[4];
        let after = env.step(Action::Switch).unwrap().observation[4];
        // Below minimum green: the committed phase cannot have moved.
        assert_eq!(before, after);
    }

    #[test]
    fn switch_commits_through_yellow_after_min_green() {
        let mut env = make_env();
        env.reset().unwrap();
        for _ in 0..10 {
            env.step(Action::Hold).unwrap();
        }
        env.step(Action::Switch).unwrap();
        // Yellow running: agent-visible phase still the outgoing green.
        assert_eq!(env.step(Action::Hold).unwrap().observation[4], 0.0);
        env.step(Action::Hold).unwrap();
        let committed = env.step(Action::Hold).unwrap();
        assert_eq!(committed.observation[4], 1.0);
    }

    /// Adapter that reports an exhausted scenario after a few ticks.
    struct DryingSim {
        inner: SyntheticSim,
        ticks_left: u64,
    }

    impl TrafficSim for DryingSim {
        fn reset(&mut self, scenario: &crate::Scenario) -> Result<(), SimError> {
            self.inner.reset(scenario)
        }
        fn advance_tick(&mut self) -> Result<(), SimError> {
            self.ticks_left = self.ticks_left.saturating_sub(1);
            self.inner.advance_tick()
        }
        fn query_approach(
            &mut self,
            intersection: &str,
            direction: Direction,
        ) -> Result<ApproachQuery, SimError> {
            self.inner.query_approach(intersection, direction)
        }
        fn query_phase(&mut self, intersection: &str) -> Result<PhaseId, SimError> {
            self.inner.query_phase(intersection)
        }
        fn set_phase(&mut self, intersection: &str, phase: PhaseId) -> Result<(), SimError> {
            self.inner.set_phase(intersection, phase)
        }
        fn expected_vehicles(&mut self) -> Result<u64, SimError> {
            Ok(self.ticks_left)
        }
    }

    #[test]
    fn episode_ends_when_scenario_is_exhausted() {
        let sim = DryingSim {
            inner: SyntheticSim::single_intersection(1),
            ticks_left: 3,
        };
        let mut env =
            SingleIntersectionEnv::new(sim, Scenario::balanced(), EnvConfig::default());
        env.reset().unwrap();
        assert!(!env.step(Action::Hold).unwrap().done);
        assert!(!env.step(Action::Hold).unwrap().done);
        assert!(env.step(Action::Hold).unwrap().done);
    }
}
