//! Per-vehicle operational state machine.
//!
//! A vehicle cycles `EnRoute -> AwaitingQueueEntry -> InQueue -> Charging ->
//! EnRoute`. Only [`Vehicle::advance`] moves it along the timed edges
//! (flight and charging); the station moves it through the queue edges via
//! the [`Chargeable`] capability.
//!
//! # Known approximation
//!
//! [`Chargeable::mark_charging`] resets the elapsed time to zero instead of
//! carrying the moment the vehicle left the queue. Charging can therefore be
//! timed up to one tick late relative to the queue exit.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::chargeable::Chargeable;
use crate::profile::ModelProfile;
use crate::report::VehicleSummary;

// ---------------------------------------------------------------------------
// Operation state
// ---------------------------------------------------------------------------

/// The four operating modes of a vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationState {
    #[default]
    EnRoute,
    /// Transient: landed but not yet handed to the station. Must never be
    /// observed at the start of a tick.
    AwaitingQueueEntry,
    InQueue,
    Charging,
}

impl OperationState {
    /// Duration threshold of the state for `profile`, if the state is timed.
    pub fn threshold(self, profile: &ModelProfile) -> Option<f64> {
        match self {
            OperationState::EnRoute => Some(profile.endurance()),
            OperationState::Charging => Some(profile.time_to_charge()),
            OperationState::AwaitingQueueEntry | OperationState::InQueue => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VehicleError {
    /// The driver advanced a vehicle that was never handed to the station.
    #[error("protocol violation: advance called in state {0:?}")]
    ProtocolViolation(OperationState),
    #[error("invalid time delta: {0}")]
    InvalidDelta(f64),
}

// ---------------------------------------------------------------------------
// Advance outcome
// ---------------------------------------------------------------------------

/// What happened to a vehicle during one [`Vehicle::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvanceOutcome {
    pub from: OperationState,
    pub to: OperationState,
    /// Portion of the delta past the state threshold. Zero without a
    /// transition.
    pub overrun: f64,
}

impl AdvanceOutcome {
    pub fn state_changed(&self) -> bool {
        self.from != self.to
    }
}

// ---------------------------------------------------------------------------
// Vehicle
// ---------------------------------------------------------------------------

/// One vehicle bound to a shared [`ModelProfile`].
///
/// Deliberately not `Clone`: a copy would feed the shared profile twice.
#[derive(Debug)]
pub struct Vehicle {
    profile: Rc<ModelProfile>,
    state: OperationState,
    elapsed_in_state: f64,
    total_en_route: f64,
    total_charging: f64,
    total_waiting: f64,
    total_overrun: f64,
}

impl Vehicle {
    /// Create a vehicle en route with zeroed timers and count it in the
    /// profile's fleet.
    pub fn new(profile: Rc<ModelProfile>) -> Self {
        profile.register_vehicle();
        Self {
            profile,
            state: OperationState::EnRoute,
            elapsed_in_state: 0.0,
            total_en_route: 0.0,
            total_charging: 0.0,
            total_waiting: 0.0,
            total_overrun: 0.0,
        }
    }

    pub fn profile(&self) -> &Rc<ModelProfile> {
        &self.profile
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    /// Minutes spent in the current state.
    pub fn elapsed_in_state(&self) -> f64 {
        self.elapsed_in_state
    }

    pub fn total_en_route(&self) -> f64 {
        self.total_en_route
    }

    pub fn total_charging(&self) -> f64 {
        self.total_charging
    }

    pub fn total_waiting(&self) -> f64 {
        self.total_waiting
    }

    /// Minutes that fell past a state threshold and were carried into the
    /// next state rather than credited to any accumulator.
    pub fn total_overrun(&self) -> f64 {
        self.total_overrun
    }

    /// Advance the state machine by `dt` simulated minutes.
    ///
    /// Timed states (flight, charging) accumulate until their threshold is
    /// reached; the call that reaches it switches state and carries the
    /// overrun into the new state's elapsed time. Queue time accumulates
    /// until the station starts charging the vehicle.
    ///
    /// # Errors
    ///
    /// [`VehicleError::ProtocolViolation`] if the vehicle is still awaiting
    /// queue entry, and [`VehicleError::InvalidDelta`] for a negative or
    /// non-finite `dt`. The vehicle is left untouched in both cases.
    pub fn advance(&mut self, dt: f64) -> Result<AdvanceOutcome, VehicleError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(VehicleError::InvalidDelta(dt));
        }

        let from = self.state;
        let mut overrun = 0.0;

        match self.state {
            OperationState::EnRoute => {
                let endurance = self.profile.endurance();
                if let Some(excess) = self.run_timed(dt, endurance) {
                    self.profile.add_flight_time(dt - excess);
                    self.total_en_route += dt - excess;
                    self.state = OperationState::AwaitingQueueEntry;
                    overrun = excess;
                } else {
                    self.profile.add_flight_time(dt);
                    self.total_en_route += dt;
                }
            }
            OperationState::AwaitingQueueEntry => {
                tracing::error!(state = ?self.state, "vehicle advanced before entering the charge queue");
                return Err(VehicleError::ProtocolViolation(self.state));
            }
            OperationState::InQueue => {
                self.total_waiting += dt;
                self.profile.add_waiting_time(dt);
            }
            OperationState::Charging => {
                let time_to_charge = self.profile.time_to_charge();
                if let Some(excess) = self.run_timed(dt, time_to_charge) {
                    self.profile.add_charging_time(dt - excess);
                    self.total_charging += dt - excess;
                    self.state = OperationState::EnRoute;
                    overrun = excess;
                } else {
                    self.profile.add_charging_time(dt);
                    self.total_charging += dt;
                }
            }
        }

        if self.state != from {
            self.total_overrun += overrun;
            tracing::debug!(
                model = self.profile.label(),
                ?from,
                to = ?self.state,
                overrun,
                "vehicle changed state"
            );
        }

        Ok(AdvanceOutcome {
            from,
            to: self.state,
            overrun,
        })
    }

    /// Add `dt` to the elapsed time of a timed state. Returns the overrun
    /// past `threshold` when the threshold is reached, in which case the
    /// elapsed time restarts at that overrun.
    fn run_timed(&mut self, dt: f64, threshold: f64) -> Option<f64> {
        let next = self.elapsed_in_state + dt;
        if next < threshold {
            self.elapsed_in_state = next;
            None
        } else {
            // Credit never exceeds dt, even if elapsed somehow sits past the
            // threshold already.
            let excess = (next - threshold).min(dt);
            self.elapsed_in_state = excess;
            Some(excess)
        }
    }

    /// Read-only summary of this vehicle's lifetime totals.
    pub fn summary(&self) -> VehicleSummary {
        let params = self.profile.params();
        VehicleSummary {
            label: params.label.clone(),
            endurance: params.endurance,
            total_en_route: self.total_en_route,
            total_charging: self.total_charging,
            total_waiting: self.total_waiting,
            passenger_miles: (self.total_en_route / 60.0)
                * params.cruise_speed
                * f64::from(params.passenger_count),
        }
    }
}

impl Chargeable for Vehicle {
    fn mark_charging(&mut self) {
        self.state = OperationState::Charging;
        self.elapsed_in_state = 0.0;
    }

    fn is_charging(&self) -> bool {
        self.state == OperationState::Charging
    }

    fn mark_queued(&mut self) {
        self.state = OperationState::InQueue;
    }

    fn is_awaiting_queue_entry(&self) -> bool {
        self.state == OperationState::AwaitingQueueEntry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn new_vehicle_is_en_route() {
        let profile = test_profile();
        let vehicle = Vehicle::new(profile.clone());
        assert_eq!(vehicle.state(), OperationState::EnRoute);
        assert_eq!(vehicle.elapsed_in_state(), 0.0);
        assert_eq!(vehicle.total_en_route(), 0.0);
        assert_eq!(profile.fleet_count(), 1);
    }

    #[test]
    fn each_vehicle_counts_once() {
        let profile = test_profile();
        let _a = Vehicle::new(profile.clone());
        let _b = Vehicle::new(profile.clone());
        let _c = Vehicle::new(profile.clone());
        assert_eq!(profile.fleet_count(), 3);
    }

    #[test]
    fn full_cycle() {
        let mut vehicle = Vehicle::new(test_profile());

        vehicle.advance(1.0).unwrap();
        assert_eq!(vehicle.state(), OperationState::EnRoute);

        vehicle.advance(75.9).unwrap();
        assert_eq!(vehicle.state(), OperationState::EnRoute);

        let outcome = vehicle.advance(0.1).unwrap();
        assert!(outcome.state_changed());
        assert_eq!(vehicle.state(), OperationState::AwaitingQueueEntry);

        vehicle.mark_charging();
        assert_eq!(vehicle.state(), OperationState::Charging);

        vehicle.advance(43.9).unwrap();
        assert_eq!(vehicle.state(), OperationState::Charging);

        vehicle.advance(0.1).unwrap();
        assert_eq!(vehicle.state(), OperationState::EnRoute);
    }

    #[test]
    fn exact_threshold_transitions_without_overrun() {
        let mut vehicle = Vehicle::new(test_profile());
        let outcome = vehicle.advance(77.0).unwrap();
        assert_eq!(outcome.to, OperationState::AwaitingQueueEntry);
        assert_eq!(outcome.overrun, 0.0);
        assert_eq!(vehicle.elapsed_in_state(), 0.0);
        assert_eq!(vehicle.total_en_route(), 77.0);
    }

    #[test]
    fn overrun_carries_into_next_state() {
        let mut vehicle = Vehicle::new(test_profile());
        vehicle.advance(70.0).unwrap();
        let outcome = vehicle.advance(10.0).unwrap();

        assert_eq!(outcome.to, OperationState::AwaitingQueueEntry);
        assert!((outcome.overrun - 3.0).abs() < 1e-9);
        assert!((vehicle.elapsed_in_state() - 3.0).abs() < 1e-9);
        // Only the capped portion counts as flight.
        assert!((vehicle.total_en_route() - 77.0).abs() < 1e-9);
        assert!((vehicle.total_overrun() - 3.0).abs() < 1e-9);
        assert!((vehicle.profile().total_flight_time() - 77.0).abs() < 1e-9);
    }

    #[test]
    fn charging_overrun_starts_next_flight() {
        let mut vehicle = Vehicle::new(test_profile());
        land(&mut vehicle);
        vehicle.mark_queued();
        vehicle.mark_charging();

        vehicle.advance(40.0).unwrap();
        vehicle.advance(6.0).unwrap();

        assert_eq!(vehicle.state(), OperationState::EnRoute);
        assert!((vehicle.elapsed_in_state() - 2.0).abs() < 1e-9);
        assert!((vehicle.total_charging() - 44.0).abs() < 1e-9);
        assert!((vehicle.profile().total_charging_time() - 44.0).abs() < 1e-9);
    }

    #[test]
    fn queue_time_accumulates_without_transition() {
        let mut vehicle = Vehicle::new(test_profile());
        land(&mut vehicle);
        vehicle.mark_queued();

        for _ in 0..10 {
            let outcome = vehicle.advance(100.0).unwrap();
            assert!(!outcome.state_changed());
        }
        assert_eq!(vehicle.state(), OperationState::InQueue);
        assert!((vehicle.total_waiting() - 1000.0).abs() < 1e-9);
        assert!((vehicle.profile().total_waiting_time() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn advance_while_awaiting_queue_entry_is_a_protocol_violation() {
        let mut vehicle = Vehicle::new(test_profile());
        land(&mut vehicle);

        let err = vehicle.advance(1.0).unwrap_err();
        assert_eq!(
            err,
            VehicleError::ProtocolViolation(OperationState::AwaitingQueueEntry)
        );
        assert_eq!(vehicle.state(), OperationState::AwaitingQueueEntry);
        assert_eq!(vehicle.total_waiting(), 0.0);
    }

    #[test]
    fn negative_delta_rejected() {
        let mut vehicle = Vehicle::new(test_profile());
        assert_eq!(vehicle.advance(-0.5), Err(VehicleError::InvalidDelta(-0.5)));
        assert!(vehicle.advance(f64::INFINITY).is_err());
        assert_eq!(vehicle.elapsed_in_state(), 0.0);
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut vehicle = Vehicle::new(test_profile());
        let outcome = vehicle.advance(0.0).unwrap();
        assert!(!outcome.state_changed());
        assert_eq!(vehicle.elapsed_in_state(), 0.0);
    }

    #[test]
    fn mark_charging_resets_elapsed() {
        let mut vehicle = Vehicle::new(test_profile());
        vehicle.advance(80.0).unwrap();
        assert!(vehicle.elapsed_in_state() > 0.0);
        vehicle.mark_queued();
        vehicle.mark_charging();
        assert_eq!(vehicle.elapsed_in_state(), 0.0);
    }

    #[test]
    fn capability_queries_track_state() {
        let mut vehicle = Vehicle::new(test_profile());
        assert!(!vehicle.is_charging());
        assert!(!vehicle.is_awaiting_queue_entry());

        land(&mut vehicle);
        assert!(vehicle.is_awaiting_queue_entry());

        vehicle.mark_queued();
        assert!(!vehicle.is_awaiting_queue_entry());
        assert_eq!(vehicle.state(), OperationState::InQueue);

        vehicle.mark_charging();
        assert!(vehicle.is_charging());
    }

    #[test]
    fn thresholds_per_state() {
        let profile = test_profile();
        assert_eq!(OperationState::EnRoute.threshold(&profile), Some(77.0));
        assert_eq!(OperationState::Charging.threshold(&profile), Some(44.0));
        assert_eq!(OperationState::InQueue.threshold(&profile), None);
        assert_eq!(OperationState::AwaitingQueueEntry.threshold(&profile), None);
    }

    #[test]
    fn summary_passenger_miles() {
        let mut vehicle = Vehicle::new(test_profile());
        vehicle.advance(60.0).unwrap();
        let summary = vehicle.summary();
        assert_eq!(summary.label, "Test");
        assert_eq!(summary.endurance, 77.0);
        assert_eq!(summary.total_en_route, 60.0);
        // One hour at 22 mph with 3 passengers.
        assert!((summary.passenger_miles - 66.0).abs() < 1e-9);
    }
}
