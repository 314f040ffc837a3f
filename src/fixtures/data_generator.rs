use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::constant::HUB_ADDRESS;
use crate::distance::DistanceDirectory;
use crate::domain::package::{Package, PackageId};
use crate::registry::PackageRegistry;

/// A reproducible delivery instance: locations on a grid, packages scattered over them.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub directory: DistanceDirectory,
    pub registry: PackageRegistry,
    /// Every package id, shuffled.
    pub manifest: Vec<PackageId>,
}

/// Builds `location_count` stops (hub included) at random grid points with
/// Euclidean distances rounded to a tenth of a mile, and `package_count`
/// packages addressed to random non-hub stops.
pub fn generate_scenario(location_count: usize, package_count: usize, seed: u64) -> Scenario {
    assert!(location_count >= 2, "need the hub and at least one stop");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let points: Vec<(f64, f64)> = (0..location_count)
        .map(|_| (rng.gen_range(0.0..20.0), rng.gen_range(0.0..20.0)))
        .collect();
    let addresses: Vec<String> = std::iter::once(HUB_ADDRESS.to_string())
        .chain((1..location_count).map(|i| format!("{i:03} Stop Lane")))
        .collect();

    let matrix: Vec<Vec<f64>> = points
        .iter()
        .map(|&(x1, y1)| {
            points
                .iter()
                .map(|&(x2, y2)| (((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt() * 10.0).round() / 10.0)
                .collect()
        })
        .collect();

    let directory = DistanceDirectory::new(addresses.clone(), matrix)
        .expect("generated matrix is square and non-negative");

    let registry: PackageRegistry = (1..=package_count as PackageId)
        .map(|id| {
            let stop = rng.gen_range(1..location_count);
            Package::new(id, addresses[stop].clone(), "Salt Lake City", "UT", "84101", "EOD", 1.0, "")
        })
        .collect();

    let mut manifest: Vec<PackageId> = (1..=package_count as PackageId).collect();
    manifest.shuffle(&mut rng);
    debug!("Generated scenario seed {} manifest {:?}", seed, manifest);

    Scenario {
        directory,
        registry,
        manifest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_scenario() {
        let a = generate_scenario(8, 12, 64);
        let b = generate_scenario(8, 12, 64);
        assert_eq!(a.manifest, b.manifest);
        assert_eq!(a.directory.addresses(), b.directory.addresses());
        assert!(a.directory.is_symmetric());
        assert_eq!(a.registry.len(), 12);
        assert_eq!(a.directory.hub(), HUB_ADDRESS);
    }
}
