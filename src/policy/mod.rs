//! Decision policies.
//!
//! The [`Policy`] trait is the capability interface both training harnesses
//! depend on; the implementations here are non-learned baselines used for
//! evaluation and as lower bounds for trained controllers.

mod fixed;
mod heuristic;
mod random;
mod trait_;

pub use fixed::FixedCyclePolicy;
pub use heuristic::QueueHeuristicPolicy;
pub use random::RandomPolicy;
pub use trait_::Policy;
