use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

use colored::*;
use csv::Writer;
use itertools::Itertools;
use serde::Serialize;

use crate::dispatch::FleetReport;
use crate::domain::package::{Package, PackageId, PackageStatus};
use crate::domain::time::SimTime;
use crate::registry::PackageRegistry;

/// One line of the per-package delivery export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageRow {
    pub id: PackageId,
    pub truck: Option<u32>,
    pub address: String,
    pub zip: String,
    pub deadline: String,
    pub status: String,
    pub departure: Option<SimTime>,
    pub delivery: Option<SimTime>,
    pub on_time: Option<bool>,
}

/// Status of a package as seen at a given moment.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub id: PackageId,
    pub truck: Option<u32>,
    pub status: PackageStatus,
    pub delivered_at: Option<SimTime>,
}

fn truck_of(report: &FleetReport) -> HashMap<PackageId, u32> {
    report
        .trucks
        .iter()
        .flat_map(|t| t.visited.iter().map(move |&id| (id, t.id)))
        .collect()
}

pub fn package_rows(registry: &PackageRegistry, report: &FleetReport) -> Vec<PackageRow> {
    let trucks = truck_of(report);
    registry
        .iter()
        .map(|p| PackageRow {
            id: p.id,
            truck: trucks.get(&p.id).copied(),
            address: p.address.clone(),
            zip: p.zip.clone(),
            deadline: p.deadline.clone(),
            status: p.status.to_string(),
            departure: p.departure_time,
            delivery: p.delivery_time,
            on_time: p.delivered_on_time(),
        })
        .collect()
}

pub fn write_package_csv(
    path: impl AsRef<Path>,
    registry: &PackageRegistry,
    report: &FleetReport,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(path)?;
    for row in package_rows(registry, report) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Rebuilds every package's status at `time` from the recorded timestamps.
pub fn snapshot_at(registry: &PackageRegistry, report: &FleetReport, time: SimTime) -> Vec<SnapshotRow> {
    let trucks = truck_of(report);
    registry
        .iter()
        .map(|p| {
            let status = p.status_at(time);
            SnapshotRow {
                id: p.id,
                truck: trucks.get(&p.id).copied(),
                status,
                delivered_at: (status == PackageStatus::Delivered)
                    .then_some(p.delivery_time)
                    .flatten(),
            }
        })
        .collect()
}

pub fn print_summary(report: &FleetReport, registry: &PackageRegistry) {
    println!("\n=======================================================");
    println!("| FINAL REPORT: DELIVERY SIMULATION");
    println!("=======================================================");
    for truck in &report.trucks {
        println!(
            "| Truck {} (driver {}): {:.2} miles, {} -> {}",
            truck.id, truck.driver, truck.mileage, truck.start_time, truck.return_time
        );
        println!("|   route: {}", truck.visited.iter().join(", "));
    }
    println!("-------------------------------------------------------");
    println!("| TOTAL ALL ROUTES MILEAGE: {:.2} miles", report.total_mileage());
    println!("=======================================================\n");

    let late: Vec<&Package> = registry
        .iter()
        .filter(|p| p.delivered_on_time() == Some(false))
        .collect();
    if late.is_empty() {
        println!("{}", "All deadlines met".green());
    } else {
        for package in late {
            println!("{}", format!("LATE: {package}").red());
        }
    }

    let undelivered = registry
        .iter()
        .filter(|p| p.status != PackageStatus::Delivered)
        .map(|p| p.id)
        .join(", ");
    if !undelivered.is_empty() {
        println!("{}", format!("Not delivered: {undelivered}").yellow());
    }
}

pub fn print_snapshot(rows: &[SnapshotRow], time: SimTime) {
    println!("\nPackage status at {time}:");
    for row in rows {
        let truck = row.truck.map_or("-".to_string(), |t| t.to_string());
        let line = match row.delivered_at {
            Some(at) => format!("{:>3}  truck {:>2}  {} at {}", row.id, truck, row.status, at),
            None => format!("{:>3}  truck {:>2}  {}", row.id, truck, row.status),
        };
        match row.status {
            PackageStatus::Delivered => println!("{}", line.green()),
            PackageStatus::EnRoute => println!("{}", line.yellow()),
            PackageStatus::AtHub => println!("{line}"),
        }
    }
}
