pub mod package;
pub mod time;
pub mod truck;

pub use package::{Package, PackageId, PackageStatus};
pub use time::SimTime;
pub use truck::Truck;
