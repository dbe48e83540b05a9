//! Configuration for the traffic-signal environments.

/// Timing and reward-shaping parameters shared by both environments.
///
/// Defaults match the reference signal program: a 10-tick minimum green,
/// a 3-tick yellow, observations clipped at 50 vehicles, and a delta reward
/// scaled by 100 with buses weighted 3x.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvConfig {
    // --- Observation ---
    /// Vehicle counts are clipped to this maximum in observations.
    pub max_vehicles: u32,

    // --- Signal timing ---
    /// Ticks a green phase must hold before a switch can commit.
    pub min_green_ticks: u32,
    /// Duration of the transitional yellow/all-red phase.
    pub yellow_ticks: u32,

    // --- Reward shaping ---
    /// Divisor applied to both waiting-time deltas.
    pub reward_scale: f64,
    /// Multiplier on the bus waiting-time delta (public-transport priority).
    pub bus_weight: f64,
    /// Bonus when the green faces the approach with strictly more vehicles.
    pub busy_bonus: f64,
    /// Penalty when the green faces an empty approach while the other waits.
    pub empty_penalty: f64,
}

impl EnvConfig {
    /// Length of one intersection's observation vector:
    /// `[ns_count, ew_count, bus_ns, bus_ew, phase_index]`.
    pub const OBS_DIM: usize = 5;

    /// Number of discrete actions per intersection (hold / switch).
    pub const ACTION_DIM: usize = 2;

    /// Length of the joint observation for `n_agents` intersections.
    pub fn joint_observation_dim(n_agents: usize) -> usize {
        n_agents * Self::OBS_DIM
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_vehicles: 50,
            min_green_ticks: 10,
            yellow_ticks: 3,
            reward_scale: 100.0,
            bus_weight: 3.0,
            busy_bonus: 1.0,
            empty_penalty: 2.0,
        }
    }
}
