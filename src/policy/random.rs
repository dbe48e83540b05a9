//! Random policy for sanity checks and lower-bound baselines.

use rand::Rng;

use super::trait_::Policy;
use crate::env::Action;

/// Uniformly random hold/switch selection.
pub struct RandomPolicy;

impl RandomPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &[f64]) -> Action {
        if rand::thread_rng().gen_bool(0.5) {
            Action::Switch
        } else {
            Action::Hold
        }
    }

    fn name(&self) -> &str {
        "random"
    }
}
