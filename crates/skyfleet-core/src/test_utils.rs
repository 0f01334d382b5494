//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use std::rc::Rc;

use crate::chargeable::Chargeable;
use crate::config::SimConfig;
use crate::profile::{ModelParams, ModelProfile};
use crate::sim::SimulationStrategy;
use crate::vehicle::{OperationState, Vehicle};

// ===========================================================================
// Profiles
// ===========================================================================

/// Test model: speed 22, battery 33, charge 44 min, 55 kWh/mile,
/// 3 passengers, 0.66 faults/hour, 77 min endurance.
pub fn test_params() -> ModelParams {
    ModelParams {
        label: "Test".to_string(),
        cruise_speed: 22.0,
        battery_capacity: 33.0,
        time_to_charge: 44.0,
        energy_use: 55.0,
        passenger_count: 3,
        max_faults_per_hour: 0.66,
        endurance: 77.0,
    }
}

pub fn test_profile() -> Rc<ModelProfile> {
    Rc::new(ModelProfile::new(test_params()).expect("test params are valid"))
}

/// A profile with custom endurance and charge time.
pub fn profile_with(endurance: f64, time_to_charge: f64) -> Rc<ModelProfile> {
    let params = ModelParams {
        endurance,
        time_to_charge,
        ..test_params()
    };
    Rc::new(ModelProfile::new(params).expect("custom params are valid"))
}

// ===========================================================================
// Vehicles
// ===========================================================================

/// Fly `vehicle` for exactly the rest of its endurance so it lands with no
/// overrun.
pub fn land(vehicle: &mut Vehicle) {
    assert_eq!(vehicle.state(), OperationState::EnRoute);
    let remaining = vehicle.profile().endurance() - vehicle.elapsed_in_state();
    vehicle
        .advance(remaining)
        .expect("en-route vehicle always advances");
    assert_eq!(vehicle.state(), OperationState::AwaitingQueueEntry);
}

// ===========================================================================
// Configurations
// ===========================================================================

/// A small deterministic configuration: test model only, coarse steps.
pub fn small_config(fleet_size: usize, charger_slots: usize) -> SimConfig {
    SimConfig {
        models: vec![test_params()],
        fleet_size,
        charger_slots,
        run_minutes: 600.0,
        strategy: SimulationStrategy::FixedStep { minutes: 1.0 },
        seed: 7,
    }
}

// ===========================================================================
// Mock chargeable
// ===========================================================================

/// Minimal chargeable entity with externally controlled charging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockChargeable {
    pub awaiting: bool,
    pub queued: bool,
    pub charging: bool,
}

impl MockChargeable {
    /// An entity that just landed and is ready to be admitted.
    pub fn landed() -> Self {
        Self {
            awaiting: true,
            ..Self::default()
        }
    }

    /// Simulate the entity's own state machine finishing its charge.
    pub fn finish_charging(&mut self) {
        self.charging = false;
    }
}

impl Chargeable for MockChargeable {
    fn mark_charging(&mut self) {
        self.queued = false;
        self.charging = true;
    }

    fn is_charging(&self) -> bool {
        self.charging
    }

    fn mark_queued(&mut self) {
        self.awaiting = false;
        self.queued = true;
    }

    fn is_awaiting_queue_entry(&self) -> bool {
        self.awaiting
    }
}
