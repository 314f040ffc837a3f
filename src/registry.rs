use std::collections::HashMap;

use itertools::Itertools;

use crate::domain::package::{Package, PackageId};

/// Packages keyed by id. Lookups are O(1) on average; the simulator's
/// selection step performs one per manifest entry per delivery.
#[derive(Debug, Clone, Default)]
pub struct PackageRegistry {
    packages: HashMap<PackageId, Package>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `package` under `id`, replacing any previous record wholesale.
    pub fn insert(&mut self, id: PackageId, package: Package) {
        self.packages.insert(id, package);
    }

    pub fn lookup(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(&id)
    }

    pub fn lookup_mut(&mut self, id: PackageId) -> Option<&mut Package> {
        self.packages.get_mut(&id)
    }

    pub fn contains(&self, id: PackageId) -> bool {
        self.packages.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All packages in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values().sorted_by_key(|p| p.id)
    }
}

impl FromIterator<Package> for PackageRegistry {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        let mut registry = PackageRegistry::new();
        for package in iter {
            registry.insert(package.id, package);
        }
        registry
    }
}
