use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::package::{Package, PackageId};
use crate::error::LoadError;
use crate::registry::PackageRegistry;

/// Struct to match the package file's columns
#[derive(Debug, Deserialize)]
struct PackageRow {
    #[serde(alias = "Package ID", alias = "package id")]
    id: String,
    #[serde(alias = "Address")]
    address: String,
    #[serde(alias = "City")]
    city: String,
    #[serde(alias = "State")]
    state: String,
    #[serde(alias = "Zip")]
    zip: String,
    #[serde(alias = "Delivery Deadline", alias = "delivery deadline")]
    deadline: String,
    #[serde(alias = "Weight KILO", alias = "weight kilo")]
    weight: String,
    #[serde(default, alias = "Special Notes", alias = "special notes")]
    notes: String,
}

pub fn load_package_csv(path: impl AsRef<Path>) -> Result<PackageRegistry, LoadError> {
    let reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(path.as_ref())?;
    info!("Loading packages from {}", path.as_ref().display());
    build_registry(reader)
}

/// Reads a package CSV with a header row. Rows that fail to parse are logged
/// and skipped; reading stops at the first row with a blank id.
pub fn read_packages<R: Read>(source: R) -> Result<PackageRegistry, LoadError> {
    let reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(source);
    build_registry(reader)
}

fn build_registry<R: Read>(mut reader: csv::Reader<R>) -> Result<PackageRegistry, LoadError> {
    let mut registry = PackageRegistry::new();

    for (row, result) in reader.deserialize::<PackageRow>().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                error!("Skipping package row {}: {}", row, e);
                continue;
            }
        };
        if raw.id.is_empty() {
            break;
        }
        match into_package(raw, row) {
            Ok(package) => registry.insert(package.id, package),
            Err(e) => error!("Skipping package: {}", e),
        }
    }

    if registry.is_empty() {
        return Err(LoadError::Empty("package file"));
    }
    info!("Loaded {} packages", registry.len());
    Ok(registry)
}

fn into_package(raw: PackageRow, row: usize) -> Result<Package, LoadError> {
    // Spreadsheet exports turn integers into "1.0".
    let id: PackageId = strip_decimal(&raw.id)
        .parse()
        .map_err(|_| LoadError::MalformedRow {
            row,
            reason: format!("package id '{}' is not a positive integer", raw.id),
        })?;
    if id == 0 {
        return Err(LoadError::MalformedRow {
            row,
            reason: "package id must be positive".to_string(),
        });
    }
    let weight: f64 = raw.weight.parse().map_err(|_| LoadError::MalformedRow {
        row,
        reason: format!("weight '{}' is not a number", raw.weight),
    })?;

    Ok(Package::new(
        id,
        raw.address,
        raw.city,
        raw.state,
        strip_decimal(&raw.zip),
        raw.deadline,
        weight,
        raw.notes,
    ))
}

fn strip_decimal(raw: &str) -> &str {
    raw.split('.').next().unwrap_or(raw)
}
