use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use tracing::{info, span, warn, Level};

use crate::config::constant::{DEFAULT_CAPACITY, DEFAULT_SPEED_MPH};
use crate::distance::DistanceDirectory;
use crate::domain::package::PackageId;
use crate::domain::time::SimTime;
use crate::domain::truck::Truck;
use crate::error::DispatchError;
use crate::registry::PackageRegistry;
use crate::simulation::correction::TimedAddressCorrection;
use crate::simulation::delivery::DeliverySimulator;

/// One truck's route assignment. Trucks run in the order they appear in the plan.
#[derive(Debug, Clone, Deserialize)]
pub struct TruckPlan {
    pub id: u32,
    pub driver: u32,
    /// Earliest departure. Without one, the truck leaves when its driver gets back.
    #[serde(default)]
    pub start_time: Option<SimTime>,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub packages: Vec<PackageId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FleetPlan {
    pub trucks: Vec<TruckPlan>,
    #[serde(default = "default_corrections")]
    pub corrections: Vec<TimedAddressCorrection>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_speed() -> f64 {
    DEFAULT_SPEED_MPH
}

fn default_corrections() -> Vec<TimedAddressCorrection> {
    vec![TimedAddressCorrection::package_nine()]
}

/// Problems found before running a plan. Only an invalid speed stops the run.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanIssue {
    UnknownPackage { truck: u32, package: PackageId },
    UnresolvedAddress { package: PackageId, address: String },
    OverCapacity { truck: u32, loaded: usize, capacity: usize },
    InvalidSpeed { truck: u32, speed: f64 },
    SharedPackage { package: PackageId, first: u32, second: u32 },
}

impl fmt::Display for PlanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanIssue::UnknownPackage { truck, package } => {
                write!(f, "truck {truck} lists unknown package {package}")
            }
            PlanIssue::UnresolvedAddress { package, address } => {
                write!(f, "package {package} address '{address}' is not in the distance table")
            }
            PlanIssue::OverCapacity {
                truck,
                loaded,
                capacity,
            } => write!(f, "truck {truck} carries {loaded} packages, capacity {capacity}"),
            PlanIssue::InvalidSpeed { truck, speed } => {
                write!(f, "truck {truck} speed {speed} is not a positive finite number")
            }
            PlanIssue::SharedPackage {
                package,
                first,
                second,
            } => write!(f, "package {package} is on trucks {first} and {second}"),
        }
    }
}

/// Checks a plan against the loaded data and logs every issue found.
pub fn validate_plan(
    plan: &FleetPlan,
    registry: &PackageRegistry,
    directory: &DistanceDirectory,
) -> Vec<PlanIssue> {
    let mut issues = vec![];
    let mut owner: HashMap<PackageId, u32> = HashMap::new();

    for truck in &plan.trucks {
        if !is_valid_speed(truck.speed) {
            issues.push(PlanIssue::InvalidSpeed {
                truck: truck.id,
                speed: truck.speed,
            });
        }
        if truck.packages.len() > truck.capacity {
            issues.push(PlanIssue::OverCapacity {
                truck: truck.id,
                loaded: truck.packages.len(),
                capacity: truck.capacity,
            });
        }

        for &package_id in &truck.packages {
            if let Some(&first) = owner.get(&package_id) {
                if first != truck.id {
                    issues.push(PlanIssue::SharedPackage {
                        package: package_id,
                        first,
                        second: truck.id,
                    });
                }
                continue;
            }
            owner.insert(package_id, truck.id);

            match registry.lookup(package_id) {
                None => issues.push(PlanIssue::UnknownPackage {
                    truck: truck.id,
                    package: package_id,
                }),
                Some(package) if directory.resolve_index(&package.address).is_none() => {
                    issues.push(PlanIssue::UnresolvedAddress {
                        package: package_id,
                        address: package.address.clone(),
                    })
                }
                Some(_) => {}
            }
        }
    }

    for issue in &issues {
        warn!("Plan issue: {}", issue);
    }
    issues
}

fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct TruckSummary {
    pub id: u32,
    pub driver: u32,
    pub start_time: SimTime,
    pub return_time: SimTime,
    pub mileage: f64,
    pub visited: Vec<PackageId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetReport {
    pub trucks: Vec<TruckSummary>,
}

impl FleetReport {
    pub fn total_mileage(&self) -> f64 {
        self.trucks.iter().map(|t| t.mileage).sum()
    }

    /// When the last truck is back at the hub.
    pub fn finish_time(&self) -> Option<SimTime> {
        self.trucks
            .iter()
            .map(|t| t.return_time)
            .max_by(|a, b| a.hours().total_cmp(&b.hours()))
    }
}

/// Runs every truck in plan order, one at a time.
///
/// A driver who already finished a route takes the next truck at the later of
/// that truck's start time and the driver's return.
pub fn run_fleet(
    plan: &FleetPlan,
    registry: &mut PackageRegistry,
    directory: &DistanceDirectory,
) -> Result<FleetReport, DispatchError> {
    let fleet_span = span!(Level::INFO, "fleet", trucks = plan.trucks.len());
    let _guard = fleet_span.enter();

    let simulator = DeliverySimulator::new(directory, &plan.corrections);
    let mut driver_free_at: HashMap<u32, SimTime> = HashMap::new();
    let mut report = FleetReport::default();

    for truck_plan in &plan.trucks {
        if !is_valid_speed(truck_plan.speed) {
            return Err(DispatchError::InvalidSpeed { truck: truck_plan.id });
        }

        let start_time = match (truck_plan.start_time, driver_free_at.get(&truck_plan.driver)) {
            (Some(start), Some(&free)) if free > start => free,
            (Some(start), _) => start,
            (None, Some(&free)) => free,
            (None, None) => {
                return Err(DispatchError::MissingStartTime {
                    truck: truck_plan.id,
                    driver: truck_plan.driver,
                })
            }
        };

        let mut truck = Truck::new(
            truck_plan.id,
            start_time,
            truck_plan.capacity,
            truck_plan.speed,
            directory.hub(),
        )
        .with_manifest(truck_plan.packages.clone());
        if truck.is_over_capacity() {
            warn!(
                "Truck {} loaded with {} packages over capacity {}",
                truck.id,
                truck.manifest.len(),
                truck.capacity
            );
        }

        let mileage = simulator.run(&mut truck, registry);
        if !mileage.is_finite() {
            return Err(DispatchError::NonFiniteMileage { truck: truck.id });
        }

        driver_free_at.insert(truck_plan.driver, truck.current_time);
        info!(
            "Truck {} (driver {}) done: {:.2} miles, back at {}",
            truck.id, truck_plan.driver, mileage, truck.current_time
        );
        report.trucks.push(TruckSummary {
            id: truck.id,
            driver: truck_plan.driver,
            start_time,
            return_time: truck.current_time,
            mileage,
            visited: truck.visited,
        });
    }

    info!("Total mileage for all routes: {:.2}", report.total_mileage());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::package::{Package, PackageStatus};

    const HUB: &str = "4001 South 700 East";

    fn directory() -> DistanceDirectory {
        DistanceDirectory::new(
            vec![HUB.to_string(), "A St".to_string(), "B St".to_string()],
            vec![
                vec![0.0, 9.0, 3.0],
                vec![9.0, 0.0, 6.0],
                vec![3.0, 6.0, 0.0],
            ],
        )
        .unwrap()
    }

    fn registry() -> PackageRegistry {
        [(1, "A St"), (2, "B St"), (3, "B St"), (4, "Nowhere")]
            .into_iter()
            .map(|(id, address)| Package::new(id, address, "SLC", "UT", "84101", "EOD", 1.0, ""))
            .collect()
    }

    fn truck_plan(id: u32, driver: u32, start: Option<SimTime>, packages: Vec<PackageId>) -> TruckPlan {
        TruckPlan {
            id,
            driver,
            start_time: start,
            capacity: 16,
            speed: 18.0,
            packages,
        }
    }

    #[test]
    fn driver_takes_next_truck_on_return() {
        // ARRANGE
        let plan = FleetPlan {
            trucks: vec![
                truck_plan(1, 1, Some(SimTime::from_hms(8, 0, 0)), vec![1]),
                truck_plan(2, 2, Some(SimTime::from_hms(9, 5, 0)), vec![2]),
                truck_plan(3, 1, None, vec![3]),
            ],
            corrections: vec![],
        };
        let mut registry = registry();

        // ACT
        let report = run_fleet(&plan, &mut registry, &directory()).unwrap();

        // ASSERT
        assert_eq!(report.trucks.len(), 3);
        // truck 1: 9 out, 9 back at 18 mph
        assert_eq!(report.trucks[0].return_time, SimTime::from_hms(9, 0, 0));
        assert_eq!(report.trucks[2].start_time, SimTime::from_hms(9, 0, 0));
        assert_eq!(report.trucks[1].start_time, SimTime::from_hms(9, 5, 0));
        assert_eq!(report.total_mileage(), 18.0 + 6.0 + 6.0);
        assert_eq!(
            registry.lookup(3).unwrap().departure_time,
            Some(SimTime::from_hms(9, 0, 0))
        );
        assert!(registry.iter().filter(|p| p.id != 4).all(|p| p.status == PackageStatus::Delivered));
        assert_eq!(report.finish_time().unwrap().to_string(), "09:25:00");
    }

    #[test]
    fn busy_driver_delays_a_scheduled_truck() {
        let plan = FleetPlan {
            trucks: vec![
                truck_plan(1, 1, Some(SimTime::from_hms(8, 0, 0)), vec![1]),
                truck_plan(2, 1, Some(SimTime::from_hms(8, 30, 0)), vec![2]),
            ],
            corrections: vec![],
        };
        let report = run_fleet(&plan, &mut registry(), &directory()).unwrap();
        assert_eq!(report.trucks[1].start_time, SimTime::from_hms(9, 0, 0));
    }

    #[test]
    fn first_truck_needs_a_start_time() {
        let plan = FleetPlan {
            trucks: vec![truck_plan(3, 1, None, vec![3])],
            corrections: vec![],
        };
        assert_eq!(
            run_fleet(&plan, &mut registry(), &directory()).unwrap_err(),
            DispatchError::MissingStartTime { truck: 3, driver: 1 }
        );
    }

    #[test]
    fn unreachable_package_fails_the_run() {
        let plan = FleetPlan {
            trucks: vec![truck_plan(1, 1, Some(SimTime::from_hms(8, 0, 0)), vec![4])],
            corrections: vec![],
        };
        assert_eq!(
            run_fleet(&plan, &mut registry(), &directory()).unwrap_err(),
            DispatchError::NonFiniteMileage { truck: 1 }
        );
    }

    #[test]
    fn zero_or_negative_speed_is_rejected() {
        // ARRANGE
        let mut stalled = truck_plan(1, 1, Some(SimTime::from_hms(8, 0, 0)), vec![1]);
        stalled.speed = 0.0;
        let mut reversing = truck_plan(2, 2, Some(SimTime::from_hms(8, 0, 0)), vec![2]);
        reversing.speed = -18.0;
        let plan = FleetPlan {
            trucks: vec![stalled, reversing],
            corrections: vec![],
        };
        let mut registry = registry();

        // ACT
        let issues = validate_plan(&plan, &registry, &directory());
        let result = run_fleet(&plan, &mut registry, &directory());

        // ASSERT
        assert_eq!(
            issues,
            vec![
                PlanIssue::InvalidSpeed { truck: 1, speed: 0.0 },
                PlanIssue::InvalidSpeed { truck: 2, speed: -18.0 },
            ]
        );
        assert_eq!(result.unwrap_err(), DispatchError::InvalidSpeed { truck: 1 });
        assert_eq!(registry.lookup(1).unwrap().status, PackageStatus::AtHub);
        assert_eq!(registry.lookup(1).unwrap().delivery_time, None);
    }

    #[test]
    fn validation_reports_every_issue() {
        let mut small = truck_plan(1, 1, Some(SimTime::from_hms(8, 0, 0)), vec![1, 2, 99]);
        small.capacity = 2;
        let plan = FleetPlan {
            trucks: vec![small, truck_plan(2, 2, Some(SimTime::from_hms(8, 0, 0)), vec![2, 4])],
            corrections: vec![],
        };

        let issues = validate_plan(&plan, &registry(), &directory());

        assert_eq!(
            issues,
            vec![
                PlanIssue::OverCapacity { truck: 1, loaded: 3, capacity: 2 },
                PlanIssue::UnknownPackage { truck: 1, package: 99 },
                PlanIssue::SharedPackage { package: 2, first: 1, second: 2 },
                PlanIssue::UnresolvedAddress { package: 4, address: "Nowhere".to_string() },
            ]
        );
    }
}
