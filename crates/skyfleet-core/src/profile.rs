//! Vehicle model profiles.
//!
//! A [`ModelProfile`] pairs the immutable physical and economic parameters of
//! one vehicle type with fleet-wide accumulators that every vehicle of that
//! type feeds. Profiles are shared through `Rc` and mutated through `Cell`,
//! since the simulation is strictly single-threaded.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::report::ProfileSummary;

// ---------------------------------------------------------------------------
// Model parameters
// ---------------------------------------------------------------------------

/// Immutable parameters describing one vehicle type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub label: String,
    /// Cruise speed in miles per hour.
    pub cruise_speed: f64,
    /// Battery capacity in kWh.
    pub battery_capacity: f64,
    /// Minutes needed for a full charge.
    pub time_to_charge: f64,
    /// Energy use at cruise in kWh per mile.
    pub energy_use: f64,
    pub passenger_count: u32,
    /// Faults per flight hour. Only used for reporting.
    pub max_faults_per_hour: f64,
    /// Minutes of flight on a full battery.
    pub endurance: f64,
}

impl ModelParams {
    /// Flight endurance in minutes for a battery drained at cruise.
    pub fn endurance_from_battery(battery_capacity: f64, cruise_speed: f64, energy_use: f64) -> f64 {
        (battery_capacity * 60.0) / (cruise_speed * energy_use)
    }

    /// Check every parameter. Endurance and charge time must be strictly
    /// positive; everything else must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.label.trim().is_empty() {
            return Err(ProfileError::EmptyLabel);
        }
        for (field, value) in [("endurance", self.endurance), ("time_to_charge", self.time_to_charge)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProfileError::NonPositive {
                    label: self.label.clone(),
                    field,
                    value,
                });
            }
        }
        for (field, value) in [
            ("cruise_speed", self.cruise_speed),
            ("battery_capacity", self.battery_capacity),
            ("energy_use", self.energy_use),
            ("max_faults_per_hour", self.max_faults_per_hour),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::Invalid {
                    label: self.label.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("model label must not be empty")]
    EmptyLabel,
    #[error("model '{label}': {field} must be positive, got {value}")]
    NonPositive {
        label: String,
        field: &'static str,
        value: f64,
    },
    #[error("model '{label}': {field} must be finite and non-negative, got {value}")]
    Invalid {
        label: String,
        field: &'static str,
        value: f64,
    },
}

// ---------------------------------------------------------------------------
// Model profile
// ---------------------------------------------------------------------------

/// Validated parameters plus fleet-wide accumulators for one vehicle type.
///
/// Accumulators only grow. They are updated exclusively by
/// [`Vehicle`](crate::vehicle::Vehicle) instances bound to this profile, and
/// `fleet_count` equals the number of vehicles constructed against it.
#[derive(Debug)]
pub struct ModelProfile {
    params: ModelParams,
    fleet_count: Cell<u32>,
    total_flight_time: Cell<f64>,
    total_charging_time: Cell<f64>,
    total_waiting_time: Cell<f64>,
}

impl ModelProfile {
    /// Validate `params` and create a profile with zeroed accumulators.
    pub fn new(params: ModelParams) -> Result<Self, ProfileError> {
        params.validate()?;
        Ok(Self {
            params,
            fleet_count: Cell::new(0),
            total_flight_time: Cell::new(0.0),
            total_charging_time: Cell::new(0.0),
            total_waiting_time: Cell::new(0.0),
        })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn label(&self) -> &str {
        &self.params.label
    }

    pub fn endurance(&self) -> f64 {
        self.params.endurance
    }

    pub fn time_to_charge(&self) -> f64 {
        self.params.time_to_charge
    }

    pub fn fleet_count(&self) -> u32 {
        self.fleet_count.get()
    }

    pub fn total_flight_time(&self) -> f64 {
        self.total_flight_time.get()
    }

    pub fn total_charging_time(&self) -> f64 {
        self.total_charging_time.get()
    }

    pub fn total_waiting_time(&self) -> f64 {
        self.total_waiting_time.get()
    }

    pub(crate) fn register_vehicle(&self) {
        self.fleet_count.set(self.fleet_count.get() + 1);
    }

    pub(crate) fn add_flight_time(&self, minutes: f64) {
        self.total_flight_time.set(self.total_flight_time.get() + minutes);
    }

    pub(crate) fn add_charging_time(&self, minutes: f64) {
        self.total_charging_time.set(self.total_charging_time.get() + minutes);
    }

    pub(crate) fn add_waiting_time(&self, minutes: f64) {
        self.total_waiting_time.set(self.total_waiting_time.get() + minutes);
    }

    /// Fleet-wide summary: averages per vehicle, fault estimate and
    /// passenger-miles. Averages are zero for a profile with no vehicles.
    pub fn summary(&self) -> ProfileSummary {
        let count = self.fleet_count();
        let average = |total: f64| if count == 0 { 0.0 } else { total / f64::from(count) };

        let flight_hours = self.total_flight_time() / 60.0;
        let total_passenger_miles =
            self.params.cruise_speed * flight_hours * f64::from(self.params.passenger_count);

        ProfileSummary {
            label: self.params.label.clone(),
            fleet_count: count,
            average_flight_time: average(self.total_flight_time()),
            average_waiting_time: average(self.total_waiting_time()),
            average_charging_time: average(self.total_charging_time()),
            max_faults: self.params.max_faults_per_hour * flight_hours,
            total_passenger_miles,
            average_passenger_miles: average(total_passenger_miles),
        }
    }
}
