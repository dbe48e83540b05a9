//! Actions, validated approach state, and the auxiliary info channel.

use std::fmt;

use super::error::EnvError;
use crate::sim::ApproachQuery;

/// The binary per-intersection action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Keep the current phase.
    #[default]
    Hold,
    /// Request a phase switch (deferred if the minimum green has not elapsed).
    Switch,
}

impl Action {
    /// Integer encoding used by the discrete action space.
    pub fn index(&self) -> usize {
        match self {
            Action::Hold => 0,
            Action::Switch => 1,
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = EnvError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Hold),
            1 => Ok(Action::Switch),
            other => Err(EnvError::InvalidAction(other)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Hold => write!(f, "hold"),
            Action::Switch => write!(f, "switch"),
        }
    }
}

/// One approach's state after validation.
///
/// Built from a raw [`ApproachQuery`] by clamping out-of-range values: a
/// single malformed tick must not abort hours of training, so negative
/// counts and negative or non-finite waits are pulled to zero and counted
/// as anomalies instead of failing the episode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ApproachState {
    /// Queued vehicles, clamped to `>= 0`.
    pub vehicle_count: u32,
    /// Whether a bus is present on the approach.
    pub bus_present: bool,
    /// Aggregate non-bus waiting time in seconds, clamped to `>= 0`.
    pub waiting_time: f64,
    /// Aggregate bus waiting time in seconds, clamped to `>= 0`.
    pub bus_waiting_time: f64,
    /// Number of fields that had to be clamped.
    pub anomalies: u32,
}

impl ApproachState {
    /// Validates a raw query result, logging every clamp.
    pub fn from_query(intersection: &str, query: ApproachQuery) -> Self {
        let mut anomalies = 0;

        let vehicle_count = if query.vehicle_count < 0 {
            log::warn!(
                "{}: negative vehicle count {} clamped to 0",
                intersection,
                query.vehicle_count
            );
            anomalies += 1;
            0
        } else {
            query.vehicle_count as u32
        };

        let mut clamp_wait = |label: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                log::warn!("{}: {} {} clamped to 0.0", intersection, label, value);
                anomalies += 1;
                0.0
            }
        };
        let waiting_time = clamp_wait("waiting time", query.waiting_time);
        let bus_waiting_time = clamp_wait("bus waiting time", query.bus_waiting_time);

        Self {
            vehicle_count,
            bus_present: query.bus_present,
            waiting_time,
            bus_waiting_time,
            anomalies,
        }
    }
}

/// Per-tick auxiliary metrics for external reporting.
///
/// Carried on the info channel only; never fed back into the decision loop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepInfo {
    /// Raw non-bus waiting time across both approaches, in seconds.
    pub total_waiting: f64,
    /// Raw bus waiting time across both approaches, in seconds.
    pub bus_waiting: f64,
    /// Vehicles queued across both approaches.
    pub queued_vehicles: u32,
    /// Query anomalies compensated this tick.
    pub anomalies: u32,
}
