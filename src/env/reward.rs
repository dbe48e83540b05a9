//! Delta-based, bus-weighted reward.
//!
//! Absolute waiting time is noisy and scale-dependent across traffic
//! volumes; rewarding the *change* in waiting time keeps the learning signal
//! informative at both low and high density. Buses are weighted extra to
//! encode public-transport priority, and a small positional bonus/penalty
//! discourages policies that starve one approach outright.

use super::config::EnvConfig;
use super::types::ApproachState;
use crate::sim::Direction;

/// Waiting-time totals from the previous tick, the baseline for the delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaitingBaseline {
    /// Non-bus aggregate waiting time, in seconds.
    pub total: f64,
    /// Bus aggregate waiting time, in seconds.
    pub bus: f64,
}

impl WaitingBaseline {
    /// Current totals across both approaches, the next tick's baseline.
    pub fn from_approaches(ns: &ApproachState, ew: &ApproachState) -> Self {
        Self {
            total: ns.waiting_time + ew.waiting_time,
            bus: ns.bus_waiting_time + ew.bus_waiting_time,
        }
    }
}

/// Computes the per-intersection reward.
pub struct RewardComputer;

impl RewardComputer {
    /// Reward for one tick.
    ///
    /// ```text
    /// delta     = prev_total_waiting - current_total_waiting   (non-bus)
    /// bus_delta = prev_bus_waiting - current_bus_waiting
    /// reward    = delta / scale + bus_delta * bus_weight / scale
    ///           + busy_bonus     if green faces strictly more vehicles
    ///           - empty_penalty  if green faces 0 while the other waits
    /// ```
    ///
    /// `green` is `None` during the yellow transition, in which case the
    /// positional terms are skipped (there is no green to judge). Equal
    /// queues earn neither bonus nor penalty.
    pub fn compute(
        baseline: &WaitingBaseline,
        ns: &ApproachState,
        ew: &ApproachState,
        green: Option<Direction>,
        config: &EnvConfig,
    ) -> f64 {
        let current = WaitingBaseline::from_approaches(ns, ew);
        let delta = baseline.total - current.total;
        let bus_delta = baseline.bus - current.bus;

        let mut reward =
            delta / config.reward_scale + bus_delta * config.bus_weight / config.reward_scale;

        if let Some(direction) = green {
            let (green_count, red_count) = match direction {
                Direction::NorthSouth => (ns.vehicle_count, ew.vehicle_count),
                Direction::EastWest => (ew.vehicle_count, ns.vehicle_count),
            };
            if green_count > red_count {
                reward += config.busy_bonus;
            } else if green_count == 0 && red_count > 0 {
                reward -= config.empty_penalty;
            }
            // Equal non-zero queues: deliberately neither term.
        }

        reward
    }
}
