use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::DirectoryError;

/// Known locations plus a symmetric distance table between them.
///
/// Built once from loader output and read-only afterwards; every simulator
/// run borrows the same directory.
///
/// Address lookup happens in two phases:
/// 1. [`exact_index`](Self::exact_index): hash lookup of the trimmed address, O(1).
/// 2. [`fuzzy_index`](Self::fuzzy_index): linear scan for substring containment in
///    either direction, returning the first hit. O(n) per unresolved address.
///
/// The fallback exists because the package file and the distance table do not
/// spell addresses byte-for-byte the same way.
#[derive(Debug, Clone)]
pub struct DistanceDirectory {
    addresses: Vec<String>,
    index: HashMap<String, usize>,
    matrix: Vec<Vec<f64>>,
}

impl DistanceDirectory {
    /// `addresses[i]` names row and column `i` of `matrix`. The hub is expected at index 0.
    pub fn new(addresses: Vec<String>, matrix: Vec<Vec<f64>>) -> Result<Self, DirectoryError> {
        if addresses.is_empty() {
            return Err(DirectoryError::NoLocations);
        }
        if addresses.len() != matrix.len() {
            return Err(DirectoryError::LengthMismatch {
                addresses: addresses.len(),
                rows: matrix.len(),
            });
        }
        for (row, values) in matrix.iter().enumerate() {
            if values.len() != addresses.len() {
                return Err(DirectoryError::NotSquare {
                    row,
                    len: values.len(),
                    expected: addresses.len(),
                });
            }
            if let Some((col, &value)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(DirectoryError::InvalidDistance { row, col, value });
            }
        }

        let addresses: Vec<String> = addresses.into_iter().map(|a| a.trim().to_string()).collect();
        let mut index = HashMap::with_capacity(addresses.len());
        for (i, address) in addresses.iter().enumerate() {
            // First occurrence wins on duplicates.
            index.entry(address.clone()).or_insert(i);
        }

        Ok(Self {
            addresses,
            index,
            matrix,
        })
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// The depot: first entry of the address list.
    pub fn hub(&self) -> &str {
        &self.addresses[0]
    }

    pub fn exact_index(&self, address: &str) -> Option<usize> {
        self.index.get(address.trim()).copied()
    }

    pub fn fuzzy_index(&self, address: &str) -> Option<usize> {
        let clean = address.trim();
        self.addresses
            .iter()
            .position(|known| known.contains(clean) || clean.contains(known.as_str()))
    }

    /// Exact match first, then the substring scan. `None` if neither phase matches.
    pub fn resolve_index(&self, address: &str) -> Option<usize> {
        if let Some(i) = self.exact_index(address) {
            return Some(i);
        }
        let fuzzy = self.fuzzy_index(address);
        match fuzzy {
            Some(i) => debug!("Address '{}' matched '{}' by substring", address, self.addresses[i]),
            None => warn!("Address not found in distance data: '{}'", address),
        }
        fuzzy
    }

    /// Stored distance between two addresses, or `f64::INFINITY` if either is unknown.
    pub fn distance(&self, from: &str, to: &str) -> f64 {
        match (self.resolve_index(from), self.resolve_index(to)) {
            (Some(i), Some(j)) => self.matrix[i][j],
            _ => f64::INFINITY,
        }
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.len()).all(|i| (0..i).all(|j| self.matrix[i][j] == self.matrix[j][i]))
    }
}
