//! Satchel
//!
//! Loads a catalog of actions, picks the most profitable subset within the budget and prints a
//! report.

use std::{io, time::Instant};

use anyhow::Result;
use tracing::{debug, info};

use satchel::{
    catalog::Catalog,
    config::{Config, OutputFormat, Strategy},
    instrumentation::{
        CompositeObserver, MemoryObserver, ProgressSeries, TimingObserver, TracingProgress,
    },
    logging,
    report::Report,
    solvers::{Solver, ilp::IlpSolver},
};

/// Satchel entry point
pub fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|err| err.exit());

    logging::init(&config.logging)?;

    let currency = config.currency()?;
    let budget = config.budget()?;
    let catalog = Catalog::from_path(&config.catalog, currency)?;

    info!(
        catalog = %config.catalog.display(),
        items = catalog.len(),
        dropped = catalog.dropped().len(),
        budget = budget.minor_units(),
        strategy = config.strategy.name(),
        "catalog loaded"
    );

    let started = Instant::now();
    let mut progress = ProgressSeries::default();

    let result = match config.strategy {
        Strategy::Dp => {
            let mut timing = TimingObserver::default();
            let mut memory = MemoryObserver::default();
            let mut progress_log = TracingProgress::default();

            let mut observers = CompositeObserver::new()
                .with(&mut timing)
                .with(&mut memory)
                .with(&mut progress_log);

            if config.progress {
                observers.push(&mut progress);
            }

            let result = config
                .dp_solver()
                .solve_with_observer(catalog.items(), budget, &mut observers)?;

            drop(observers);

            debug!(
                table_bytes = memory.table_bytes(),
                cells = memory.cells(),
                elapsed = timing.display().unwrap_or_default(),
                "profit table released"
            );

            result
        }
        Strategy::BruteForce | Strategy::Combinations => {
            config.brute_force_solver().solve(catalog.items(), budget)?
        }
        Strategy::Ilp => IlpSolver::new().solve(catalog.items(), budget)?,
    };

    let elapsed = started.elapsed();

    let report = Report::new(config.strategy.name(), &catalog, budget, result)
        .with_elapsed(elapsed)
        .with_progress(progress.into_points());

    let stdout = io::stdout();
    let handle = stdout.lock();

    match config.format {
        OutputFormat::Table => report.write_table(handle)?,
        OutputFormat::Yaml => report.write_yaml(handle)?,
    }

    Ok(())
}
