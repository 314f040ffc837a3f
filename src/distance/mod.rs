pub mod directory;

pub use directory::DistanceDirectory;
