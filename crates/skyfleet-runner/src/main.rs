//! Runs the reference scenario once and prints the fleet report.
//!
//! Log verbosity follows `RUST_LOG` (default `info`); set
//! `RUST_LOG=skyfleet_core=debug` to trace every landing and slot change.

use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use skyfleet_core::config::SimConfig;
use skyfleet_core::error::SimError;
use skyfleet_core::simulation::Simulation;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "simulation aborted");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), SimError> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let config = SimConfig {
        seed,
        ..SimConfig::default()
    };
    tracing::info!(seed, "starting skyfleet simulation");

    let mut sim = Simulation::new(&config)?;
    let summary = sim.run()?;

    println!("{summary}");
    println!();
    print!("{}", sim.report());
    Ok(())
}
