pub mod distances;
pub mod manifest;
pub mod packages;

pub use distances::{load_distance_csv, read_distance_table};
pub use manifest::{load_fleet_plan, parse_fleet_plan};
pub use packages::{load_package_csv, read_packages};
