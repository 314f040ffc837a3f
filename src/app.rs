use std::error::Error;

use dotenv::dotenv;
use tracing::{error, info, span, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::HUB_ADDRESS;
use crate::config::RunConfig;
use crate::dispatch::{run_fleet, validate_plan};
use crate::loader::{load_distance_csv, load_fleet_plan, load_package_csv};
use crate::report::{print_snapshot, print_summary, snapshot_at, write_package_csv};

/// Initialize tracing; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

pub fn run() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    init_tracing();
    let config = RunConfig::from_env();

    let (directory, mut registry, plan) = {
        let span = span!(Level::INFO, "load");
        let _guard = span.enter();
        let directory = load_distance_csv(&config.distance_csv, HUB_ADDRESS)?;
        let registry = load_package_csv(&config.package_csv)?;
        let plan = load_fleet_plan(&config.manifest_json)?;
        (directory, registry, plan)
    };

    let issues = validate_plan(&plan, &registry, &directory);
    if !issues.is_empty() {
        info!("Plan has {} issue(s), running anyway", issues.len());
    }

    let report = match run_fleet(&plan, &mut registry, &directory) {
        Ok(report) => report,
        Err(e) => {
            error!("Simulation failed: {}", e);
            return Err(e.into());
        }
    };

    print_summary(&report, &registry);
    if let Some(time) = config.snapshot_at {
        print_snapshot(&snapshot_at(&registry, &report, time), time);
    }

    write_package_csv(&config.report_csv, &registry, &report)?;
    info!("Wrote package report to {}", config.report_csv);
    Ok(())
}
