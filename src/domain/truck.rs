use crate::domain::package::PackageId;
use crate::domain::time::SimTime;

/// Mutable state of one vehicle for the length of a single delivery run.
#[derive(Debug, Clone)]
pub struct Truck {
    pub id: u32,
    /// Informational; manifests longer than this are logged, not rejected.
    pub capacity: usize,
    /// Distance units per hour.
    pub speed: f64,
    pub start_time: SimTime,
    pub current_time: SimTime,
    pub mileage: f64,
    pub current_location: String,
    pub manifest: Vec<PackageId>,
    pub visited: Vec<PackageId>,
}

impl Truck {
    pub fn new(id: u32, start_time: SimTime, capacity: usize, speed: f64, hub: &str) -> Self {
        Self {
            id,
            capacity,
            speed,
            start_time,
            current_time: start_time,
            mileage: 0.0,
            current_location: hub.to_string(),
            manifest: vec![],
            visited: vec![],
        }
    }

    pub fn with_manifest(mut self, manifest: Vec<PackageId>) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn is_over_capacity(&self) -> bool {
        self.manifest.len() > self.capacity
    }

    /// Move the truck over `distance` at its speed.
    pub fn travel(&mut self, distance: f64) {
        self.current_time = self.current_time.advanced_by(distance / self.speed);
        self.mileage += distance;
    }
}
