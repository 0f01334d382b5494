//! The simulation driver: owns the fleet, the profiles and the charging
//! station, and sequences the tick pipeline.
//!
//! # Architecture
//!
//! The `Simulation` owns:
//! - One shared [`ModelProfile`] per configured model
//! - A [`Fleet`] of vehicles, each bound to a randomly chosen profile
//! - A [`ChargingStation`] keyed by [`VehicleId`]
//! - A [`SimRng`] for model assignment and advancement order
//! - A [`SimState`] (tick counter, elapsed minutes)
//!
//! # Tick Pipeline
//!
//! Each `step()` runs:
//! 1. **Shuffle** -- randomize the advancement order
//! 2. **Advance** -- every vehicle advances once; a vehicle that lands is
//!    admitted to the wait queue right after its own advance
//! 3. **Reconcile** -- the station frees finished slots and serves the queue
//! 4. **Bookkeeping** -- tick counter and elapsed time

use std::rc::Rc;
use std::time::Instant;

use slotmap::SecondaryMap;

use crate::chargeable::Chargeable;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::fleet::Fleet;
use crate::id::{ProfileId, VehicleId};
use crate::profile::ModelProfile;
use crate::report::{FleetReport, RunSummary};
use crate::rng::SimRng;
use crate::sim::{SimState, SimulationStrategy, StateHash, TickClock};
use crate::station::{ChargingStation, ReconcileOutcome};
use crate::vehicle::{OperationState, Vehicle};

// ---------------------------------------------------------------------------
// Tick outcome
// ---------------------------------------------------------------------------

/// What happened during one [`Simulation::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Vehicles that landed and joined the wait queue, in advancement order.
    pub landed: Vec<VehicleId>,
    /// Vehicles that finished charging and took off again.
    pub departed: Vec<VehicleId>,
    /// Slot changes made by the station.
    pub station: ReconcileOutcome<VehicleId>,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Simulation {
    profiles: Vec<Rc<ModelProfile>>,
    fleet: Fleet,
    assignments: SecondaryMap<VehicleId, ProfileId>,
    station: ChargingStation<VehicleId>,
    /// Advancement order, reshuffled every tick.
    order: Vec<VehicleId>,
    rng: SimRng,
    strategy: SimulationStrategy,
    run_minutes: f64,
    sim_state: SimState,
}

impl Simulation {
    /// Validate `config`, build the profiles, generate the fleet and create
    /// the charging station.
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let profiles = config
            .models
            .iter()
            .map(|params| ModelProfile::new(params.clone()).map(Rc::new))
            .collect::<Result<Vec<_>, _>>()?;

        let mut rng = SimRng::new(config.seed);
        let mut fleet = Fleet::new();
        let mut assignments = SecondaryMap::new();
        for _ in 0..config.fleet_size {
            let index = rng.below(profiles.len());
            let id = fleet.insert(Vehicle::new(Rc::clone(&profiles[index])));
            assignments.insert(id, ProfileId(index as u32));
        }

        let station = ChargingStation::new(config.charger_slots)?;
        let order = fleet.ids();

        tracing::info!(
            vehicles = fleet.len(),
            models = profiles.len(),
            slots = config.charger_slots,
            seed = config.seed,
            "fleet generated"
        );

        Ok(Self {
            profiles,
            fleet,
            assignments,
            station,
            order,
            rng,
            strategy: config.strategy,
            run_minutes: config.run_minutes,
            sim_state: SimState::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn station(&self) -> &ChargingStation<VehicleId> {
        &self.station
    }

    pub fn profiles(&self) -> &[Rc<ModelProfile>] {
        &self.profiles
    }

    pub fn profile(&self, id: ProfileId) -> Option<&Rc<ModelProfile>> {
        self.profiles.get(id.0 as usize)
    }

    /// The profile a vehicle was assigned at generation.
    pub fn profile_of(&self, vehicle: VehicleId) -> Option<ProfileId> {
        self.assignments.get(vehicle).copied()
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.fleet.get(id)
    }

    pub fn sim_state(&self) -> &SimState {
        &self.sim_state
    }

    pub fn strategy(&self) -> SimulationStrategy {
        self.strategy
    }

    // -----------------------------------------------------------------------
    // Tick pipeline
    // -----------------------------------------------------------------------

    /// Run one tick of `dt` simulated minutes.
    ///
    /// # Errors
    ///
    /// Any [`VehicleError`](crate::vehicle::VehicleError) or
    /// [`StationError`] raised during the tick. Both mean the tick protocol
    /// was broken; the simulation should not be stepped further.
    pub fn step(&mut self, dt: f64) -> Result<TickOutcome, SimError> {
        let mut outcome = TickOutcome::default();

        // Phase 1: Shuffle.
        self.rng.shuffle(&mut self.order);

        // Phase 2: Advance.
        for &id in &self.order {
            let Some(vehicle) = self.fleet.get_mut(id) else {
                continue;
            };
            let advanced = vehicle.advance(dt)?;
            if advanced.state_changed() && advanced.from == OperationState::Charging {
                outcome.departed.push(id);
            }
            if vehicle.is_awaiting_queue_entry() {
                self.station.admit(id, vehicle)?;
                outcome.landed.push(id);
            }
        }

        // Phase 3: Reconcile.
        outcome.station = self.station.reconcile(&mut self.fleet)?;

        // Phase 4: Bookkeeping.
        self.sim_state.tick += 1;
        self.sim_state.elapsed_minutes += dt;

        tracing::trace!(
            tick = self.sim_state.tick,
            elapsed = self.sim_state.elapsed_minutes,
            queued = self.station.queue_len(),
            charging = self.station.in_service_len(),
            "tick complete"
        );

        Ok(outcome)
    }

    /// Step until the configured run duration has elapsed, drawing each
    /// tick's delta from the configured strategy.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        let started = Instant::now();
        let first_tick = self.sim_state.tick;
        let mut clock = TickClock::new(self.strategy);

        tracing::info!(
            run_minutes = self.run_minutes,
            strategy = ?self.strategy,
            "simulation started"
        );

        while self.sim_state.elapsed_minutes < self.run_minutes {
            let dt = clock.next_delta();
            self.step(dt)?;
        }

        let summary = RunSummary {
            ticks: self.sim_state.tick - first_tick,
            simulated_minutes: self.sim_state.elapsed_minutes,
            wall_time: started.elapsed(),
        };
        tracing::info!(
            ticks = summary.ticks,
            simulated_minutes = summary.simulated_minutes,
            wall_seconds = summary.wall_time.as_secs_f64(),
            "simulation finished"
        );
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Reporting
    // -----------------------------------------------------------------------

    /// Per-vehicle summaries in fleet order, then per-model summaries in
    /// configuration order.
    pub fn report(&self) -> FleetReport {
        let (vehicle_ids, vehicles) = self
            .fleet
            .iter()
            .map(|(id, vehicle)| (id, vehicle.summary()))
            .unzip();
        FleetReport {
            vehicle_ids,
            vehicles,
            profiles: self.profiles.iter().map(|p| p.summary()).collect(),
        }
    }

    /// Deterministic hash over every vehicle's state and timers plus the
    /// station occupancy.
    pub fn state_hash(&self) -> u64 {
        let mut hash = StateHash::new();
        hash.write_u64(self.sim_state.tick);
        for (_, vehicle) in self.fleet.iter() {
            hash.write_u8(vehicle.state() as u8);
            hash.write_f64(vehicle.elapsed_in_state());
            hash.write_f64(vehicle.total_en_route());
            hash.write_f64(vehicle.total_charging());
            hash.write_f64(vehicle.total_waiting());
        }
        hash.write_u64(self.station.queue_len() as u64);
        hash.write_u64(self.station.in_service_len() as u64);
        hash.finish()
    }
}
