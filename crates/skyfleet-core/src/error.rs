use crate::config::ConfigError;
use crate::profile::ProfileError;
use crate::station::StationError;
use crate::vehicle::VehicleError;

/// Errors surfaced by the simulation driver.
///
/// Construction problems come from [`ConfigError`] and [`ProfileError`];
/// [`VehicleError`] and [`StationError`] during a tick indicate a broken
/// driver protocol and end the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid model profile: {0}")]
    Profile(#[from] ProfileError),

    #[error("vehicle error: {0}")]
    Vehicle(#[from] VehicleError),

    #[error("charging station error: {0}")]
    Station(#[from] StationError),
}
