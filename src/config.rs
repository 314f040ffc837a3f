use std::env;

use tracing::{info, warn};

use crate::domain::time::SimTime;

pub mod constant {
    pub const HUB_ADDRESS: &str = "4001 South 700 East";
    pub const DEFAULT_SPEED_MPH: f64 = 18.0;
    pub const DEFAULT_CAPACITY: usize = 16;

    pub const DISTANCE_CSV_PATH: &str = "data/distances.csv";
    pub const PACKAGE_CSV_PATH: &str = "data/packages.csv";
    pub const MANIFEST_JSON_PATH: &str = "data/manifest.json";
    pub const REPORT_CSV_PATH: &str = "delivery_report.csv";

    // Wrong address on package 9 is corrected at 10:20.
    pub const CORRECTED_PACKAGE_ID: u32 = 9;
    pub const CORRECTION_AVAILABLE_AT: &str = "10:20:00";
    pub const CORRECTED_ADDRESS: &str = "410 S State St";
    pub const CORRECTED_ZIP: &str = "84111";
}

/// File locations and options for a single simulation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub distance_csv: String,
    pub package_csv: String,
    pub manifest_json: String,
    pub report_csv: String,
    pub snapshot_at: Option<SimTime>,
}

impl RunConfig {
    /// Reads `WGUPS_*` variables, falling back to the defaults in [`constant`].
    pub fn from_env() -> Self {
        let snapshot_at = match env::var("WGUPS_SNAPSHOT_TIME") {
            Ok(raw) => match SimTime::parse(&raw) {
                Some(time) => Some(time),
                None => {
                    warn!("WGUPS_SNAPSHOT_TIME '{}' is not a valid HH:MM[:SS] time, ignoring", raw);
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            distance_csv: var_or("WGUPS_DISTANCE_CSV", constant::DISTANCE_CSV_PATH),
            package_csv: var_or("WGUPS_PACKAGE_CSV", constant::PACKAGE_CSV_PATH),
            manifest_json: var_or("WGUPS_MANIFEST_JSON", constant::MANIFEST_JSON_PATH),
            report_csv: var_or("WGUPS_REPORT_CSV", constant::REPORT_CSV_PATH),
            snapshot_at,
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default {default}");
        default.to_string()
    })
}
