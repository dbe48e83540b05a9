//! Signal-phase state machine.
//!
//! A switch decision never moves green to green directly: it always inserts
//! the transitional yellow phase, and a switch requested before the minimum
//! green has elapsed is queued rather than rejected. The transitional phase
//! is an internal multi-tick consequence of one switch decision; it is not a
//! separate action.

use crate::sim::{
    Direction, PhaseId, SimError, TrafficSim, PHASE_EW_GREEN, PHASE_NS_GREEN, PHASE_YELLOW,
};

/// A green signal configuration; the agent-visible phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NsGreen,
    EwGreen,
}

impl Phase {
    /// The next green phase in the fixed cycle.
    pub fn next(&self) -> Phase {
        match self {
            Phase::NsGreen => Phase::EwGreen,
            Phase::EwGreen => Phase::NsGreen,
        }
    }

    /// Observation encoding (0 = NS green, 1 = EW green).
    pub fn index(&self) -> usize {
        match self {
            Phase::NsGreen => 0,
            Phase::EwGreen => 1,
        }
    }

    /// The approach this phase gives green to.
    pub fn green_direction(&self) -> Direction {
        match self {
            Phase::NsGreen => Direction::NorthSouth,
            Phase::EwGreen => Direction::EastWest,
        }
    }

    /// Phase index in the simulator's signal program.
    pub fn phase_id(&self) -> PhaseId {
        match self {
            Phase::NsGreen => PHASE_NS_GREEN,
            Phase::EwGreen => PHASE_EW_GREEN,
        }
    }
}

/// Where the signal machine is within the switch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    /// A green phase is active and no switch is queued.
    Stable,
    /// A switch was requested before the minimum green elapsed; it stays
    /// queued and is re-evaluated each tick.
    PendingSwitch,
    /// The yellow phase is running; commits when the countdown hits zero.
    InTransition { remaining: u32 },
}

/// Per-intersection phase state machine.
#[derive(Debug, Clone)]
pub struct SignalController {
    phase: Phase,
    state: SignalState,
    /// Ticks since the last committed phase change.
    elapsed: u32,
    min_green_ticks: u32,
    yellow_ticks: u32,
}

impl SignalController {
    pub fn new(min_green_ticks: u32, yellow_ticks: u32) -> Self {
        Self {
            phase: Phase::NsGreen,
            state: SignalState::Stable,
            elapsed: 0,
            min_green_ticks,
            yellow_ticks,
        }
    }

    /// The agent-visible phase. Unchanged while the yellow runs; it only
    /// moves when the transition commits.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> SignalState {
        self.state
    }

    /// Ticks since the last committed phase change.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// The approach currently held at green, or `None` mid-transition.
    pub fn green_direction(&self) -> Option<Direction> {
        match self.state {
            SignalState::InTransition { .. } => None,
            _ => Some(self.phase.green_direction()),
        }
    }

    /// Reinitializes the machine to NS green and pushes that phase to the
    /// simulator. The only way to clear accumulated phase state.
    pub fn reset(&mut self, sim: &mut dyn TrafficSim, intersection: &str) -> Result<(), SimError> {
        self.phase = Phase::NsGreen;
        self.state = SignalState::Stable;
        self.elapsed = 0;
        sim.set_phase(intersection, self.phase.phase_id())
    }

    /// Drives the machine one tick forward under the given action.
    ///
    /// Called once per environment step, before the simulation advances.
    pub fn apply(
        &mut self,
        sim: &mut dyn TrafficSim,
        intersection: &str,
        switch_requested: bool,
    ) -> Result<(), SimError> {
        match self.state {
            SignalState::InTransition { remaining } => {
                // Actions are ignored until the transition commits.
                if remaining <= 1 {
                    self.commit(sim, intersection)?;
                } else {
                    self.state = SignalState::InTransition {
                        remaining: remaining - 1,
                    };
                }
            }
            SignalState::Stable | SignalState::PendingSwitch => {
                let wants_switch =
                    switch_requested || self.state == SignalState::PendingSwitch;
                if wants_switch {
                    if self.elapsed >= self.min_green_ticks {
                        self.begin_transition(sim, intersection)?;
                    } else {
                        self.state = SignalState::PendingSwitch;
                    }
                }
                if !matches!(self.state, SignalState::InTransition { .. }) {
                    self.elapsed += 1;
                }
            }
        }
        Ok(())
    }

    fn begin_transition(
        &mut self,
        sim: &mut dyn TrafficSim,
        intersection: &str,
    ) -> Result<(), SimError> {
        if self.yellow_ticks == 0 {
            // Degenerate configuration: commit on the same tick.
            return self.commit(sim, intersection);
        }
        sim.set_phase(intersection, PHASE_YELLOW)?;
        self.state = SignalState::InTransition {
            remaining: self.yellow_ticks,
        };
        Ok(())
    }

    fn commit(&mut self, sim: &mut dyn TrafficSim, intersection: &str) -> Result<(), SimError> {
        self.phase = self.phase.next();
        sim.set_phase(intersection, self.phase.phase_id())?;
        self.state = SignalState::Stable;
        self.elapsed = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;
    use crate::sim::ApproachQuery;

    /// Minimal adapter that records every set_phase call.
    struct PhaseRecorder {
        calls: Vec<(String, PhaseId)>,
    }

    impl PhaseRecorder {
        fn new() -> Self {
            Self { calls: Vec::new() }
        }
    }

    impl TrafficSim for PhaseRecorder {
        fn reset(&mut self, _scenario: &Scenario) -> Result<(), SimError> {
            Ok(())
        }
        fn advance_tick(&mut self) -> Result<(), SimError> {
            Ok(())
        }
        fn query_approach(
            &mut self,
            _intersection: &str,
            _direction: Direction,
        ) -> Result<ApproachQuery, SimError> {
            Ok(ApproachQuery::empty())
        }
        fn query_phase(&mut self, _intersection: &str) -> Result<PhaseId, SimError> {
            Ok(self.calls.last().map(|(_, p)| *p).unwrap_or(PHASE_NS_GREEN))
        }
        fn set_phase(&mut self, intersection: &str, phase: PhaseId) -> Result<(), SimError> {
            self.calls.push((intersection.to_string(), phase));
            Ok(())
        }
        fn expected_vehicles(&mut self) -> Result<u64, SimError> {
            Ok(1)
        }
    }

    fn controller() -> (SignalController, PhaseRecorder) {
        (SignalController::new(10, 3), PhaseRecorder::new())
    }

    #[test]
    fn hold_keeps_phase_and_counts_elapsed() {
        let (mut ctrl, mut sim) = controller();
        for _ in 0..5 {
            ctrl.apply(&mut sim, "tl_00", false).unwrap();
        }
        assert_eq!(ctrl.phase(), Phase::NsGreen);
        assert_eq!(ctrl.elapsed(), 5);
        assert!(sim.calls.is_empty());
    }

    #[test]
    fn early_switch_is_deferred_not_dropped() {
        let (mut ctrl, mut sim) = controller();
        ctrl.apply(&mut sim, "tl_00", true).unwrap();
        // Below min green: phase unchanged at the next tick, request latched.
        assert_eq!(ctrl.phase(), Phase::NsGreen);
        assert_eq!(ctrl.state(), SignalState::PendingSwitch);
        assert!(sim.calls.is_empty());

        // Keep holding; the latched request fires once min green elapses.
        for _ in 0..9 {
            ctrl.apply(&mut sim, "tl_00", false).unwrap();
        }
        assert_eq!(ctrl.state(), SignalState::PendingSwitch);
        ctrl.apply(&mut sim, "tl_00", false).unwrap();
        assert!(matches!(ctrl.state(), SignalState::InTransition { .. }));
        assert_eq!(sim.calls, vec![("tl_00".to_string(), PHASE_YELLOW)]);
    }

    #[test]
    fn switch_after_min_green_runs_yellow_then_commits() {
        let (mut ctrl, mut sim) = controller();
        for _ in 0..10 {
            ctrl.apply(&mut sim, "tl_00", false).unwrap();
        }
        ctrl.apply(&mut sim, "tl_00", true).unwrap();
        assert_eq!(
            ctrl.state(),
            SignalState::InTransition { remaining: 3 }
        );
        // Phase index stays on the outgoing green during yellow.
        assert_eq!(ctrl.phase(), Phase::NsGreen);
        assert_eq!(ctrl.green_direction(), None);

        ctrl.apply(&mut sim, "tl_00", false).unwrap();
        ctrl.apply(&mut sim, "tl_00", false).unwrap();
        assert!(matches!(ctrl.state(), SignalState::InTransition { .. }));
        ctrl.apply(&mut sim, "tl_00", true).unwrap(); // ignored mid-transition
        assert_eq!(ctrl.state(), SignalState::Stable);
        assert_eq!(ctrl.phase(), Phase::EwGreen);
        assert_eq!(ctrl.elapsed(), 0); // resets exactly on commit

        // Never green-to-green: yellow precedes the opposing green.
        assert_eq!(
            sim.calls,
            vec![
                ("tl_00".to_string(), PHASE_YELLOW),
                ("tl_00".to_string(), PHASE_EW_GREEN),
            ]
        );
    }

    #[test]
    fn full_cycle_returns_to_ns_green() {
        let (mut ctrl, mut sim) = controller();
        for _ in 0..2 {
            for _ in 0..10 {
                ctrl.apply(&mut sim, "tl_00", false).unwrap();
            }
            ctrl.apply(&mut sim, "tl_00", true).unwrap();
            for _ in 0..3 {
                ctrl.apply(&mut sim, "tl_00", false).unwrap();
            }
        }
        assert_eq!(ctrl.phase(), Phase::NsGreen);
        let phases: Vec<PhaseId> = sim.calls.iter().map(|(_, p)| *p).collect();
        assert_eq!(
            phases,
            vec![PHASE_YELLOW, PHASE_EW_GREEN, PHASE_YELLOW, PHASE_NS_GREEN]
        );
    }

    #[test]
    fn reset_restores_ns_green() {
        let (mut ctrl, mut sim) = controller();
        for _ in 0..10 {
            ctrl.apply(&mut sim, "tl_00", false).unwrap();
        }
        ctrl.apply(&mut sim, "tl_00", true).unwrap();
        ctrl.reset(&mut sim, "tl_00").unwrap();
        assert_eq!(ctrl.phase(), Phase::NsGreen);
        assert_eq!(ctrl.state(), SignalState::Stable);
        assert_eq!(ctrl.elapsed(), 0);
        assert_eq!(sim.calls.last().unwrap().1, PHASE_NS_GREEN);
    }

    #[test]
    fn zero_yellow_commits_immediately() {
        let mut ctrl = SignalController::new(0, 0);
        let mut sim = PhaseRecorder::new();
        ctrl.apply(&mut sim, "tl_00", true).unwrap();
        assert_eq!(ctrl.phase(), Phase::EwGreen);
        assert_eq!(ctrl.state(), SignalState::Stable);
    }
}
