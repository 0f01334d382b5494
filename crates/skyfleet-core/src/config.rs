//! Simulation configuration.
//!
//! [`SimConfig::default`] reproduces the reference scenario: five vehicle
//! models, a fleet of 20, three charging slots and three simulated hours.

use serde::{Deserialize, Serialize};

use crate::profile::{ModelParams, ProfileError};
use crate::sim::SimulationStrategy;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one vehicle model is required")]
    NoModels,
    #[error("fleet size must be at least 1")]
    EmptyFleet,
    #[error("at least one charging slot is required")]
    NoChargerSlots,
    #[error("run duration must be positive, got {0}")]
    InvalidRunDuration(f64),
    #[error("strategy step or rate must be positive, got {0}")]
    InvalidStrategy(f64),
    #[error(transparent)]
    Model(#[from] ProfileError),
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Vehicle models; each vehicle picks one uniformly at random.
    pub models: Vec<ModelParams>,
    pub fleet_size: usize,
    pub charger_slots: usize,
    /// Simulated minutes to run.
    pub run_minutes: f64,
    pub strategy: SimulationStrategy,
    /// Seed for model assignment and advancement order.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            models: builtin_models(),
            fleet_size: 20,
            charger_slots: 3,
            run_minutes: 180.0,
            strategy: SimulationStrategy::default(),
            seed: 0x5EED,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::NoModels);
        }
        if self.fleet_size == 0 {
            return Err(ConfigError::EmptyFleet);
        }
        if self.charger_slots == 0 {
            return Err(ConfigError::NoChargerSlots);
        }
        if !self.run_minutes.is_finite() || self.run_minutes <= 0.0 {
            return Err(ConfigError::InvalidRunDuration(self.run_minutes));
        }
        let scale = self.strategy.scale();
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidStrategy(scale));
        }
        for model in &self.models {
            model.validate()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Built-in models
// ---------------------------------------------------------------------------

fn model(
    label: &str,
    cruise_speed: f64,
    battery_capacity: f64,
    charge_hours: f64,
    energy_use: f64,
    passenger_count: u32,
    max_faults_per_hour: f64,
) -> ModelParams {
    ModelParams {
        label: label.to_string(),
        cruise_speed,
        battery_capacity,
        time_to_charge: charge_hours * 60.0,
        energy_use,
        passenger_count,
        max_faults_per_hour,
        endurance: ModelParams::endurance_from_battery(battery_capacity, cruise_speed, energy_use),
    }
}

/// The five reference vehicle models.
pub fn builtin_models() -> Vec<ModelParams> {
    vec![
        model("Alpha", 120.0, 320.0, 0.6, 1.6, 4, 0.25),
        model("Beta", 100.0, 100.0, 0.2, 1.5, 5, 0.10),
        model("Charlie", 160.0, 220.0, 0.8, 2.2, 3, 0.05),
        model("Delta", 90.0, 120.0, 0.62, 0.8, 2, 0.22),
        model("Echo", 30.0, 150.0, 0.3, 5.8, 2, 0.61),
    ]
}
