//! greenwave - bus-priority traffic-signal control environments
//!
//! Models traffic-signal control as a sequential decision problem: at each
//! simulation tick an agent decides whether to hold or switch a light phase,
//! with the objective of minimizing public-transport waiting time without
//! starving other traffic. The crate provides the single-intersection
//! environment, a 9-intersection coordinator sharing one simulation run,
//! baseline policies, and evaluation utilities. The microscopic traffic
//! simulator itself is consumed through the [`sim::TrafficSim`] contract.

pub mod env;
pub mod episode;
pub mod metrics;
pub mod policy;
pub mod scenario;
pub mod sim;

// Re-export the types most callers need.
pub use env::{
    Action, EnvConfig, EnvError, MultiIntersectionEnv, NetworkStepResult, RewardAggregation,
    SingleIntersectionEnv, StepInfo, StepResult,
};
pub use episode::{EpisodeLog, TickRecord};
pub use metrics::EvaluationMetrics;
pub use policy::{FixedCyclePolicy, Policy, QueueHeuristicPolicy, RandomPolicy};
pub use scenario::Scenario;
pub use sim::{ApproachQuery, Direction, RoadNetwork, SimError, SyntheticSim, TrafficSim};

/// Identifier type used for intersections and episode logs.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
