use tracing::{debug, info, span, warn, Level};

use crate::distance::DistanceDirectory;
use crate::domain::package::{PackageId, PackageStatus};
use crate::domain::truck::Truck;
use crate::registry::PackageRegistry;
use crate::simulation::correction::{AddressCorrection, NoCorrection, TimedAddressCorrection};

/// Greedy nearest-neighbour delivery loop for one truck at a time.
pub struct DeliverySimulator<'a, C: AddressCorrection + ?Sized> {
    directory: &'a DistanceDirectory,
    correction: &'a C,
}

impl<'a, C: AddressCorrection + ?Sized> DeliverySimulator<'a, C> {
    pub fn new(directory: &'a DistanceDirectory, correction: &'a C) -> Self {
        Self {
            directory,
            correction,
        }
    }

    /// Drains `truck`'s manifest and drives back to the hub.
    ///
    /// Returns the truck's final mileage including the return leg. Unknown
    /// package ids are skipped; unresolvable addresses are driven as infinite
    /// legs, leaving the clock and mileage non-finite.
    pub fn run(&self, truck: &mut Truck, registry: &mut PackageRegistry) -> f64 {
        let truck_span = span!(Level::INFO, "truck", id = truck.id);
        let _guard = truck_span.enter();

        info!(
            "Departing {} at {} with {} packages",
            truck.current_location,
            truck.start_time,
            truck.manifest.len()
        );
        depart(truck, registry);

        while let Some((package_id, mut distance)) =
            select_next_package(truck, registry, self.directory)
        {
            let Some(package) = registry.lookup_mut(package_id) else {
                break;
            };

            if let Some(fix) = self.correction.correction_for(package_id, truck.current_time) {
                if package.address != fix.address || package.zip != fix.zip {
                    info!(
                        "Correcting package {} address '{}' -> '{}' at {}",
                        package_id, package.address, fix.address, truck.current_time
                    );
                    package.address = fix.address;
                    package.zip = fix.zip;
                    distance = self
                        .directory
                        .distance(&truck.current_location, &package.address);
                }
            }

            truck.travel(distance);
            truck.current_location = package.address.clone();
            truck.visited.push(package_id);
            package.status = PackageStatus::Delivered;
            package.delivery_time = Some(truck.current_time);

            info!(
                "Delivered package {} to {} at {}. Total miles: {:.2}",
                package_id, package.address, truck.current_time, truck.mileage
            );
        }

        let hub = self.directory.hub();
        let to_hub = self.directory.distance(&truck.current_location, hub);
        if to_hub > 0.0 {
            truck.travel(to_hub);
        }

        info!(
            "Returned to hub at {}. Total route miles: {:.2}",
            truck.current_time, truck.mileage
        );
        truck.mileage
    }
}

/// Runs one truck with the standing package 9 address fix.
///
/// Use [`DeliverySimulator`] with [`NoCorrection`] to run without it.
pub fn run_delivery(
    truck: &mut Truck,
    registry: &mut PackageRegistry,
    directory: &DistanceDirectory,
) -> f64 {
    DeliverySimulator::new(directory, &TimedAddressCorrection::package_nine()).run(truck, registry)
}

/// Marks every manifest package still at the hub as en route, stamped with the truck's start.
fn depart(truck: &Truck, registry: &mut PackageRegistry) {
    for &package_id in &truck.manifest {
        match registry.lookup_mut(package_id) {
            Some(package) if package.status == PackageStatus::AtHub => {
                package.status = PackageStatus::EnRoute;
                package.departure_time = Some(truck.start_time);
            }
            Some(package) => debug!(
                "Package {} already {}, leaving it untouched",
                package_id, package.status
            ),
            None => warn!("Package {} on truck {} is not registered, skipping", package_id, truck.id),
        }
    }
}

/// Nearest en-route manifest package to the truck's current location.
///
/// Ties go to the package listed first in the manifest. An unreachable package
/// is still returned (with an infinite distance) when nothing closer remains.
pub fn select_next_package(
    truck: &Truck,
    registry: &PackageRegistry,
    directory: &DistanceDirectory,
) -> Option<(PackageId, f64)> {
    let mut best: Option<(PackageId, f64)> = None;

    for &package_id in &truck.manifest {
        let Some(package) = registry.lookup(package_id) else {
            continue;
        };
        if package.status != PackageStatus::EnRoute {
            continue;
        }

        let distance = directory.distance(&truck.current_location, &package.address);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((package_id, distance));
        }
    }

    debug!("Next stop from {}: {:?}", truck.current_location, best);
    best
}
