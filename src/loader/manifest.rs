use std::fs;
use std::path::Path;

use tracing::info;

use crate::dispatch::FleetPlan;
use crate::error::LoadError;

pub fn load_fleet_plan(path: impl AsRef<Path>) -> Result<FleetPlan, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let plan = parse_fleet_plan(&content)?;
    info!(
        "Loaded fleet plan from {} ({} trucks, {} corrections)",
        path.display(),
        plan.trucks.len(),
        plan.corrections.len()
    );
    Ok(plan)
}

pub fn parse_fleet_plan(content: &str) -> Result<FleetPlan, LoadError> {
    let plan: FleetPlan = serde_json::from_str(content)?;
    if plan.trucks.is_empty() {
        return Err(LoadError::Empty("fleet plan"));
    }
    Ok(plan)
}
