//! Housing-market simulation - main binary.
//!
//! Bootstraps a synthetic population, runs the configured number of years
//! of monthly market clearing, and reports one summary line per year.
//! The scenario is chosen by the first argument (see `config::SCENARIOS`);
//! the log level comes from the `MARKET_LOG` environment variable.

mod config;

use log::{error, info};
use simulation::{SaleLogDrain, SimConfig, Simulation};
use std::env;
use std::process::ExitCode;

/// Initialise console logging with `fern`.
///
/// `MARKET_LOG` selects the level (error, warn, info, debug, trace);
/// default is `info`.
fn init_logging() -> Result<(), fern::InitError> {
    let level = match env::var("MARKET_LOG")
        .unwrap_or_else(|_| "info".into())
        .to_lowercase()
        .as_str()
    {
        "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn run(config: SimConfig) -> Result<(), sim_core::MarketError> {
    let years = config.years;
    let mut sim = Simulation::new(config);

    // Forward sales to a background logging thread; resolution never
    // blocks on the consumer.
    let (drain, drain_handle) = SaleLogDrain::spawn(1_024);
    sim.add_hook(Box::new(drain));

    sim.run()?;

    info!(
        "finished {} years: {} sales over {} months",
        years,
        sim.stats().total_sales,
        sim.stats().months_run
    );
    drop(sim);
    let _ = drain_handle.join();
    Ok(())
}

fn main() -> ExitCode {
    if init_logging().is_err() {
        eprintln!("failed to initialise logging");
        return ExitCode::FAILURE;
    }

    let name = env::args().nth(1).unwrap_or_else(|| "demo".into());
    let Some(config) = config::scenario(&name) else {
        eprintln!(
            "unknown scenario '{}'; available: {}",
            name,
            config::SCENARIOS.join(", ")
        );
        return ExitCode::FAILURE;
    };

    info!("running scenario '{}'", name);
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("run aborted: {}", err);
            ExitCode::FAILURE
        }
    }
}
