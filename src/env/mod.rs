//! Traffic-signal control environments.
//!
//! [`SingleIntersectionEnv`] turns one intersection into a standard
//! observe/act/reward loop; [`MultiIntersectionEnv`] composes N of them over
//! one shared simulation run. Both expose fixed-shape observation and
//! action spaces declared at construction time.

pub mod config;
pub mod error;
pub mod intersection;
pub mod multi;
pub mod observation;
pub mod phase;
pub mod reward;
pub mod single;
pub mod types;

pub use config::EnvConfig;
pub use error::EnvError;
pub use intersection::IntersectionController;
pub use multi::{MultiIntersectionEnv, NetworkStepResult, RewardAggregation};
pub use observation::ObservationBuilder;
pub use phase::{Phase, SignalController, SignalState};
pub use reward::{RewardComputer, WaitingBaseline};
pub use single::{SingleIntersectionEnv, StepResult};
pub use types::{Action, ApproachState, StepInfo};
