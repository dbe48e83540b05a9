//! Policy evaluation over full episodes.
//!
//! Runs a policy for a number of episodes and aggregates the episode-level
//! metrics external reports consume: mean reward, mean waiting times, mean
//! queue length. Works for both the single intersection and the network,
//! where one shared policy is applied independently to every agent's slice
//! of the joint observation.

use std::fmt;

use crate::env::{Action, EnvConfig, EnvError, MultiIntersectionEnv, SingleIntersectionEnv};
use crate::episode::EpisodeLog;
use crate::policy::Policy;
use crate::sim::TrafficSim;

/// Aggregated evaluation metrics over multiple episodes.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvaluationMetrics {
    /// Mean cumulative reward per episode.
    pub mean_episode_reward: f64,
    /// Mean per-tick non-bus waiting time, in seconds.
    pub mean_total_waiting: f64,
    /// Mean per-tick bus waiting time, in seconds.
    pub mean_bus_waiting: f64,
    /// Mean per-tick queued vehicle count.
    pub mean_queued_vehicles: f64,
    /// Mean number of switch decisions per episode.
    pub mean_switches: f64,
    /// Total anomalies compensated across all episodes.
    pub total_anomalies: u64,
    /// Number of episodes evaluated.
    pub n_episodes: usize,
}

#[derive(Debug, Default)]
struct EpisodeStats {
    reward: f64,
    waiting_sum: f64,
    bus_waiting_sum: f64,
    queued_sum: f64,
    switches: usize,
    anomalies: u64,
    ticks: u32,
}

impl EvaluationMetrics {
    /// Runs one single-intersection episode under a policy, returning the
    /// recorded interaction log.
    pub fn record_episode<S: TrafficSim>(
        env: &mut SingleIntersectionEnv<S>,
        policy: &mut dyn Policy,
    ) -> Result<EpisodeLog, EnvError> {
        let (log, _) = Self::run_episode(env, policy)?;
        Ok(log)
    }

    fn run_episode<S: TrafficSim>(
        env: &mut SingleIntersectionEnv<S>,
        policy: &mut dyn Policy,
    ) -> Result<(EpisodeLog, EpisodeStats), EnvError> {
        let mut obs = env.reset()?;
        let mut log = EpisodeLog::new();
        let mut stats = EpisodeStats::default();

        loop {
            let action = policy.act(&obs);
            let result = env.step(action)?;
            log.push(result.tick, result.observation.clone(), action, result.reward);

            stats.reward += result.reward;
            stats.waiting_sum += result.info.total_waiting;
            stats.bus_waiting_sum += result.info.bus_waiting;
            stats.queued_sum += f64::from(result.info.queued_vehicles);
            stats.anomalies += u64::from(result.info.anomalies);
            stats.ticks += 1;
            if action == Action::Switch {
                stats.switches += 1;
            }

            obs = result.observation;
            if result.done {
                break;
            }
        }

        Ok((log, stats))
    }

    /// Evaluates a policy on the single-intersection environment.
    pub fn evaluate<S: TrafficSim>(
        env: &mut SingleIntersectionEnv<S>,
        policy: &mut dyn Policy,
        n_episodes: usize,
    ) -> Result<Self, EnvError> {
        let mut all = Vec::with_capacity(n_episodes);
        for _ in 0..n_episodes {
            let (_, stats) = Self::run_episode(env, policy)?;
            all.push(stats);
        }
        Ok(Self::aggregate(all))
    }

    /// Evaluates one shared policy on the network environment, applying it
    /// independently to each agent's slice of the joint observation.
    pub fn evaluate_network<S: TrafficSim>(
        env: &mut MultiIntersectionEnv<S>,
        policy: &mut dyn Policy,
        n_episodes: usize,
    ) -> Result<Self, EnvError> {
        let n_agents = env.n_agents();
        let mut all = Vec::with_capacity(n_episodes);

        for _ in 0..n_episodes {
            let mut joint_obs = env.reset()?;
            let mut stats = EpisodeStats::default();

            loop {
                let actions: Vec<Action> = joint_obs
                    .chunks(EnvConfig::OBS_DIM)
                    .take(n_agents)
                    .map(|slice| policy.act(slice))
                    .collect();
                let result = env.step(&actions)?;

                stats.reward += result.reward;
                for info in &result.infos {
                    stats.waiting_sum += info.total_waiting;
                    stats.bus_waiting_sum += info.bus_waiting;
                    stats.queued_sum += f64::from(info.queued_vehicles);
                    stats.anomalies += u64::from(info.anomalies);
                }
                stats.switches += actions.iter().filter(|a| **a == Action::Switch).count();
                stats.ticks += 1;

                joint_obs = result.observations;
                if result.done {
                    break;
                }
            }

            all.push(stats);
        }

        Ok(Self::aggregate(all))
    }

    fn aggregate(all: Vec<EpisodeStats>) -> Self {
        let n = all.len().max(1) as f64;
        let per_tick = |sum: f64, ticks: u32| {
            if ticks == 0 {
                0.0
            } else {
                sum / f64::from(ticks)
            }
        };

        Self {
            mean_episode_reward: all.iter().map(|s| s.reward).sum::<f64>() / n,
            mean_total_waiting: all
                .iter()
                .map(|s| per_tick(s.waiting_sum, s.ticks))
                .sum::<f64>()
                / n,
            mean_bus_waiting: all
                .iter()
                .map(|s| per_tick(s.bus_waiting_sum, s.ticks))
                .sum::<f64>()
                / n,
            mean_queued_vehicles: all
                .iter()
                .map(|s| per_tick(s.queued_sum, s.ticks))
                .sum::<f64>()
                / n,
            mean_switches: all.iter().map(|s| s.switches as f64).sum::<f64>() / n,
            total_anomalies: all.iter().map(|s| s.anomalies).sum(),
            n_episodes: all.len(),
        }
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes) ===",
            self.n_episodes
        )?;
        writeln!(f, "  Mean episode reward:   {:.2}", self.mean_episode_reward)?;
        writeln!(f, "  Mean waiting (cars):   {:.1}s", self.mean_total_waiting)?;
        writeln!(f, "  Mean waiting (buses):  {:.1}s", self.mean_bus_waiting)?;
        writeln!(f, "  Mean queued vehicles:  {:.1}", self.mean_queued_vehicles)?;
        writeln!(f, "  Mean switches:         {:.1}", self.mean_switches)?;
        writeln!(f, "  Anomalies compensated: {}", self.total_anomalies)
    }
}
