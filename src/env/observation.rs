//! Observation encoding.
//!
//! One intersection is summarized as a fixed 5-float vector:
//!
//! ```text
//! [ns_count, ew_count, bus_ns, bus_ew, phase_index]
//! ```
//!
//! Counts are clipped to `max_vehicles`, bus presence is 0/1, and the phase
//! index is the agent-visible green (0 = NS, 1 = EW). Joint observations are
//! the ordered concatenation of per-intersection vectors.

use super::config::EnvConfig;
use super::phase::Phase;
use super::types::ApproachState;

/// Builds observation vectors for intersections.
pub struct ObservationBuilder;

impl ObservationBuilder {
    /// Encodes one intersection's state.
    pub fn build(
        ns: &ApproachState,
        ew: &ApproachState,
        phase: Phase,
        config: &EnvConfig,
    ) -> Vec<f64> {
        vec![
            f64::from(ns.vehicle_count.min(config.max_vehicles)),
            f64::from(ew.vehicle_count.min(config.max_vehicles)),
            if ns.bus_present { 1.0 } else { 0.0 },
            if ew.bus_present { 1.0 } else { 0.0 },
            phase.index() as f64,
        ]
    }

    /// The all-zero observation, used when an intersection's queries fail
    /// and its slot in the joint observation must still be filled.
    pub fn zeros() -> Vec<f64> {
        vec![0.0; EnvConfig::OBS_DIM]
    }
}
