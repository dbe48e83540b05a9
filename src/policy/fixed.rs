//! Fixed-time baseline.

use super::trait_::Policy;
use crate::env::Action;

/// Classic pre-timed signal control: request a switch every `period` ticks,
/// ignoring traffic entirely. The environment's minimum-green and yellow
/// handling still apply, so the realized cycle is at least
/// `min_green + yellow` long.
pub struct FixedCyclePolicy {
    period: u32,
    counter: u32,
}

impl FixedCyclePolicy {
    /// Creates a policy that requests a switch every `period` ticks.
    /// `period` of 0 is treated as 1.
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(1),
            counter: 0,
        }
    }
}

impl Policy for FixedCyclePolicy {
    fn act(&mut self, _observation: &[f64]) -> Action {
        self.counter += 1;
        if self.counter % self.period == 0 {
            Action::Switch
        } else {
            Action::Hold
        }
    }

    fn name(&self) -> &str {
        "fixed_cycle"
    }
}
