//! Policy trait for the traffic-signal environments.

use crate::env::Action;

/// A decision rule: given one intersection's observation, choose an action.
///
/// The interface is deliberately per-intersection even in the multi-agent
/// setting: the coordinator slices the joint observation and applies one
/// policy per slot, so a policy trained on the single intersection transfers
/// to the 9-intersection network unmodified.
pub trait Policy: Send + Sync {
    /// Selects an action for one intersection.
    ///
    /// # Arguments
    ///
    /// * `observation` - A 5-float vector
    ///   `[ns_count, ew_count, bus_ns, bus_ew, phase_index]`.
    fn act(&mut self, observation: &[f64]) -> Action;

    /// Human-readable name for reports.
    fn name(&self) -> &str;
}
