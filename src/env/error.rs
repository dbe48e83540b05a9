use thiserror::Error;

use crate::sim::SimError;

/// Errors surfaced by the agent-environment interface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// The policy produced an action outside the declared action space.
    /// Always a caller bug; never silently coerced.
    #[error("invalid action value {0}; expected 0 (hold) or 1 (switch)")]
    InvalidAction(usize),

    /// A joint action's length does not match the number of agents.
    #[error("joint action has length {actual}, but the coordinator owns {expected} agents")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Fatal simulator failure; the episode cannot continue.
    #[error(transparent)]
    Sim(#[from] SimError),
}
