use thiserror::Error;

/// Errors raised by a simulator adapter.
///
/// All of these are fatal for the current episode: the environments own no
/// ground truth of their own and cannot continue without the simulator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("simulator disconnected: {0}")]
    Disconnected(String),

    #[error("unknown intersection '{0}'")]
    UnknownIntersection(String),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("invalid phase id {phase} for intersection '{intersection}'")]
    InvalidPhase { intersection: String, phase: usize },

    #[error("simulation not running; call reset first")]
    NotRunning,
}
