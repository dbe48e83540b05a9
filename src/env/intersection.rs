//! Per-intersection controller.
//!
//! Owns the derived state one intersection needs between ticks: its signal
//! machine and the previous tick's waiting-time baseline. Ground truth stays
//! in the simulator; this type only decides phases and turns fresh queries
//! into an observation, a reward, and info metrics. Both the standalone
//! environment and the network coordinator are built from it.

use super::config::EnvConfig;
use super::error::EnvError;
use super::observation::ObservationBuilder;
use super::phase::SignalController;
use super::reward::{RewardComputer, WaitingBaseline};
use super::types::{Action, ApproachState, StepInfo};
use crate::sim::{Direction, TrafficSim};
use crate::Id;

/// Core step logic for one controlled intersection.
#[derive(Debug, Clone)]
pub struct IntersectionController {
    id: Id,
    config: EnvConfig,
    signal: SignalController,
    baseline: WaitingBaseline,
}

impl IntersectionController {
    pub fn new(id: impl Into<Id>, config: EnvConfig) -> Self {
        let signal = SignalController::new(config.min_green_ticks, config.yellow_ticks);
        Self {
            id: id.into(),
            config,
            signal,
            baseline: WaitingBaseline::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn signal(&self) -> &SignalController {
        &self.signal
    }

    /// Clears local bookkeeping and reinitializes the signal, without
    /// touching the shared simulation run.
    pub fn reset_local(&mut self, sim: &mut dyn TrafficSim) -> Result<(), EnvError> {
        self.baseline = WaitingBaseline::default();
        self.signal.reset(sim, &self.id)?;
        Ok(())
    }

    /// Resolves this tick's phase decision. Does not advance the simulation.
    pub fn apply_action(
        &mut self,
        sim: &mut dyn TrafficSim,
        action: Action,
    ) -> Result<(), EnvError> {
        self.signal
            .apply(sim, &self.id, action == Action::Switch)?;
        Ok(())
    }

    /// Queries both approaches, clamping anomalies.
    fn query_approaches(
        &mut self,
        sim: &mut dyn TrafficSim,
    ) -> Result<(ApproachState, ApproachState), EnvError> {
        let ns = ApproachState::from_query(
            &self.id,
            sim.query_approach(&self.id, Direction::NorthSouth)?,
        );
        let ew = ApproachState::from_query(
            &self.id,
            sim.query_approach(&self.id, Direction::EastWest)?,
        );
        Ok((ns, ew))
    }

    /// Builds the current observation without touching the reward baseline.
    /// Used for the initial observation after a reset.
    pub fn observe(&mut self, sim: &mut dyn TrafficSim) -> Result<Vec<f64>, EnvError> {
        let (ns, ew) = self.query_approaches(sim)?;
        Ok(ObservationBuilder::build(
            &ns,
            &ew,
            self.signal.phase(),
            &self.config,
        ))
    }

    /// Post-step refresh: observation, reward, and info for this tick.
    /// Advances the waiting-time baseline.
    pub fn observe_and_reward(
        &mut self,
        sim: &mut dyn TrafficSim,
    ) -> Result<(Vec<f64>, f64, StepInfo), EnvError> {
        let (ns, ew) = self.query_approaches(sim)?;

        let reward = RewardComputer::compute(
            &self.baseline,
            &ns,
            &ew,
            self.signal.green_direction(),
            &self.config,
        );
        self.baseline = WaitingBaseline::from_approaches(&ns, &ew);

        let observation = ObservationBuilder::build(&ns, &ew, self.signal.phase(), &self.config);
        let info = StepInfo {
            total_waiting: ns.waiting_time + ew.waiting_time,
            bus_waiting: ns.bus_waiting_time + ew.bus_waiting_time,
            queued_vehicles: ns.vehicle_count + ew.vehicle_count,
            anomalies: ns.anomalies + ew.anomalies,
        };

        Ok((observation, reward, info))
    }
}
