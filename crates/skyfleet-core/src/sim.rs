//! Simulation strategy and state types.
//!
//! The driver is parameterized by a [`SimulationStrategy`] that determines
//! how large each tick's time delta is. Both strategies run the same tick
//! pipeline; they differ only in where the delta comes from.

use std::time::Instant;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Simulation strategy
// ---------------------------------------------------------------------------

/// How the driver chooses each tick's delta. Chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimulationStrategy {
    /// Every tick advances simulated time by the same amount.
    /// Deterministic by construction.
    FixedStep {
        /// Simulated minutes per tick.
        minutes: f64,
    },

    /// Real-time mode. Each tick's delta is the wall-clock time since the
    /// previous tick, scaled to simulated minutes.
    WallClock {
        /// Simulated minutes that pass per wall-clock second.
        sim_minutes_per_second: f64,
    },
}

impl Default for SimulationStrategy {
    fn default() -> Self {
        SimulationStrategy::FixedStep { minutes: 0.01 }
    }
}

impl SimulationStrategy {
    /// The rate or step of the strategy. Always positive in a valid config.
    pub fn scale(&self) -> f64 {
        match *self {
            SimulationStrategy::FixedStep { minutes } => minutes,
            SimulationStrategy::WallClock {
                sim_minutes_per_second,
            } => sim_minutes_per_second,
        }
    }
}

// ---------------------------------------------------------------------------
// Tick clock
// ---------------------------------------------------------------------------

/// Produces tick deltas according to a [`SimulationStrategy`].
#[derive(Debug, Clone)]
pub struct TickClock {
    strategy: SimulationStrategy,
    last: Instant,
}

impl TickClock {
    pub fn new(strategy: SimulationStrategy) -> Self {
        Self {
            strategy,
            last: Instant::now(),
        }
    }

    /// Delta in simulated minutes for the next tick.
    pub fn next_delta(&mut self) -> f64 {
        match self.strategy {
            SimulationStrategy::FixedStep { minutes } => minutes,
            SimulationStrategy::WallClock {
                sim_minutes_per_second,
            } => {
                let now = Instant::now();
                let seconds = now.duration_since(self.last).as_secs_f64();
                self.last = now;
                seconds * sim_minutes_per_second
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable simulation state tracked by the driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    /// Number of ticks run so far.
    pub tick: u64,

    /// Simulated minutes elapsed since the start of the run.
    pub elapsed_minutes: f64,
}

impl SimState {
    /// Create a new simulation state starting at tick 0.
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of simulation state for determinism checks.
///
/// Uses FNV-1a (64-bit) for speed and simplicity. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    /// Start a new hash.
    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    /// Feed bytes into the hash.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write(&[v]);
    }

    /// Feed an f64 by its bit pattern.
    pub fn write_f64(&mut self, v: f64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    /// Finalize and return the hash value.
    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_state_starts_at_zero() {
        let state = SimState::new();
        assert_eq!(state.tick, 0);
        assert_eq!(state.elapsed_minutes, 0.0);
    }

    #[test]
    fn default_strategy_is_fixed_step() {
        assert_eq!(
            SimulationStrategy::default(),
            SimulationStrategy::FixedStep { minutes: 0.01 }
        );
    }

    #[test]
    fn fixed_step_clock_is_constant() {
        let mut clock = TickClock::new(SimulationStrategy::FixedStep { minutes: 0.5 });
        for _ in 0..5 {
            assert_eq!(clock.next_delta(), 0.5);
        }
    }

    #[test]
    fn wall_clock_deltas_are_non_negative() {
        let mut clock = TickClock::new(SimulationStrategy::WallClock {
            sim_minutes_per_second: 60.0,
        });
        std::thread::sleep(std::time::Duration::from_millis(2));
        let dt = clock.next_delta();
        assert!(dt > 0.0);
        assert!(clock.next_delta() >= 0.0);
    }

    #[test]
    fn state_hash_deterministic() {
        let mut h1 = StateHash::new();
        h1.write_u64(42);
        h1.write_f64(7.5);

        let mut h2 = StateHash::new();
        h2.write_u64(42);
        h2.write_f64(7.5);

        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn state_hash_order_matters() {
        let mut h1 = StateHash::new();
        h1.write_u8(1);
        h1.write_u8(2);

        let mut h2 = StateHash::new();
        h2.write_u8(2);
        h2.write_u8(1);

        assert_ne!(h1.finish(), h2.finish());
    }
}
