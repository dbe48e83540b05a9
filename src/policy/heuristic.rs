//! Queue-length heuristic baseline.

use super::trait_::Policy;
use crate::env::Action;

/// Reactive baseline: switch when the red approach is doing worse.
///
/// Decision order per tick:
/// 1. A bus waiting on the red approach with none on the green requests a
///    switch (public-transport priority).
/// 2. Otherwise, a strictly longer queue on the red approach requests a
///    switch.
/// 3. Otherwise hold.
///
/// Should beat [`super::FixedCyclePolicy`] on asymmetric demand and serves
/// as the competitive non-learned baseline.
pub struct QueueHeuristicPolicy;

impl QueueHeuristicPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for QueueHeuristicPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for QueueHeuristicPolicy {
    fn act(&mut self, observation: &[f64]) -> Action {
        if observation.len() < 5 {
            return Action::Hold;
        }
        let (ns, ew) = (observation[0], observation[1]);
        let (bus_ns, bus_ew) = (observation[2] > 0.5, observation[3] > 0.5);
        let ew_green = observation[4] > 0.5;

        let (green_count, red_count) = if ew_green { (ew, ns) } else { (ns, ew) };
        let (green_bus, red_bus) = if ew_green {
            (bus_ew, bus_ns)
        } else {
            (bus_ns, bus_ew)
        };

        if red_bus && !green_bus {
            Action::Switch
        } else if red_count > green_count {
            Action::Switch
        } else {
            Action::Hold
        }
    }

    fn name(&self) -> &str {
        "queue_heuristic"
    }
}
