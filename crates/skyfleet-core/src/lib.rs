//! Skyfleet Core -- the simulation engine for electric air-taxi fleets.
//!
//! Vehicles cycle through flight, queueing, and charging against a shared
//! bank of charging slots while per-vehicle and per-model statistics
//! accumulate over simulated time.
//!
//! # Tick Pipeline
//!
//! Each call to [`simulation::Simulation::step`] advances the fleet by one
//! tick:
//!
//! 1. **Shuffle** -- Randomize the advancement order of the fleet.
//! 2. **Advance** -- Every vehicle runs its state machine for the tick delta.
//!    Vehicles that just landed are admitted to the station wait queue.
//! 3. **Reconcile** -- The station releases vehicles that finished charging
//!    and fills free slots from the head of the wait queue.
//! 4. **Bookkeeping** -- Increment the tick counter and elapsed time.
//!
//! # Key Types
//!
//! - [`vehicle::Vehicle`] -- Per-vehicle operational state machine.
//! - [`profile::ModelProfile`] -- Shared model parameters and fleet totals.
//! - [`station::ChargingStation`] -- FIFO wait queue plus bounded slots.
//! - [`chargeable::Chargeable`] -- The capability the station operates on.
//! - [`fleet::Fleet`] -- Slotmap-backed owner of every vehicle.
//! - [`simulation::Simulation`] -- Driver that sequences the pipeline.
//! - [`report`] -- Read-only summaries for presentation layers.

pub mod chargeable;
pub mod config;
pub mod error;
pub mod fleet;
pub mod id;
pub mod profile;
pub mod report;
pub mod rng;
pub mod sim;
pub mod simulation;
pub mod station;
pub mod vehicle;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
