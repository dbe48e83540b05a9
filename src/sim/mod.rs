//! Simulator adapter contract.
//!
//! The environments never touch vehicle-level ground truth directly; they
//! issue steps and queries through [`TrafficSim`], a synchronous, blocking
//! interface onto a microscopic traffic simulator. The crate ships one
//! built-in implementation, [`SyntheticSim`], a seeded queue model over a
//! [`RoadNetwork`] grid; external engines plug in by implementing the trait.

mod error;
pub mod network;
pub mod synthetic;

pub use error::SimError;
pub use network::RoadNetwork;
pub use synthetic::SyntheticSim;

use std::fmt;

use crate::scenario::Scenario;

/// Signal phase index for north-south green.
pub const PHASE_NS_GREEN: usize = 0;
/// Signal phase index for the transitional yellow/all-red phase.
pub const PHASE_YELLOW: usize = 1;
/// Signal phase index for east-west green.
pub const PHASE_EW_GREEN: usize = 2;

/// Raw phase index as understood by the simulator's signal program.
pub type PhaseId = usize;

/// Approach axis of an intersection.
///
/// Both carriageways of an axis are aggregated into one approach: the
/// environments reason about NS-vs-EW contention, not individual lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthSouth,
    EastWest,
}

impl Direction {
    /// Returns the crossing axis.
    pub fn cross(&self) -> Direction {
        match self {
            Direction::NorthSouth => Direction::EastWest,
            Direction::EastWest => Direction::NorthSouth,
        }
    }

    /// Returns both axes in observation order (NS first).
    pub fn both() -> [Direction; 2] {
        [Direction::NorthSouth, Direction::EastWest]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::NorthSouth => write!(f, "north-south"),
            Direction::EastWest => write!(f, "east-west"),
        }
    }
}

/// Raw per-approach query result.
///
/// `vehicle_count` is signed and the waiting aggregates unvalidated: a
/// desynchronized simulator can report garbage for a single tick, and the
/// environment clamps rather than aborts (a malformed tick must not kill an
/// episode). Car and bus waiting time are reported separately because the
/// reward weights them differently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproachQuery {
    /// Number of vehicles queued on this approach.
    pub vehicle_count: i64,
    /// Whether at least one bus is present on this approach.
    pub bus_present: bool,
    /// Aggregate waiting time of non-bus vehicles, in seconds.
    pub waiting_time: f64,
    /// Aggregate waiting time of buses, in seconds.
    pub bus_waiting_time: f64,
}

impl ApproachQuery {
    /// An empty approach.
    pub fn empty() -> Self {
        Self {
            vehicle_count: 0,
            bus_present: false,
            waiting_time: 0.0,
            bus_waiting_time: 0.0,
        }
    }
}

/// Synchronous step/query contract onto the traffic simulator.
///
/// All calls block until the simulator answers and may fail with a fatal
/// [`SimError`]. Exactly one component owns the instance for the lifetime of
/// an episode; there is no concurrent access to arbitrate.
pub trait TrafficSim {
    /// Restarts the simulation at episode start for the given scenario.
    fn reset(&mut self, scenario: &Scenario) -> Result<(), SimError>;

    /// Advances the shared simulation by exactly one tick.
    fn advance_tick(&mut self) -> Result<(), SimError>;

    /// Queries one approach of one intersection.
    fn query_approach(
        &mut self,
        intersection: &str,
        direction: Direction,
    ) -> Result<ApproachQuery, SimError>;

    /// Returns the phase currently active at an intersection.
    fn query_phase(&mut self, intersection: &str) -> Result<PhaseId, SimError>;

    /// Forces an intersection's signal program to the given phase.
    fn set_phase(&mut self, intersection: &str, phase: PhaseId) -> Result<(), SimError>;

    /// Number of vehicles still active or yet to be generated.
    ///
    /// Zero means the scenario is exhausted and the episode should end.
    fn expected_vehicles(&mut self) -> Result<u64, SimError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_cross_is_involutive() {
        for d in Direction::both() {
            assert_eq!(d.cross().cross(), d);
        }
    }

    #[test]
    fn empty_approach_is_zeroed() {
        let q = ApproachQuery::empty();
        assert_eq!(q.vehicle_count, 0);
        assert!(!q.bus_present);
        assert_eq!(q.waiting_time, 0.0);
        assert_eq!(q.bus_waiting_time, 0.0);
    }
}
