pub mod app;
pub mod config;
pub mod dispatch;
pub mod distance;
pub mod domain;
pub mod error;
pub mod fixtures;
pub mod loader;
pub mod registry;
pub mod report;
pub mod simulation;
