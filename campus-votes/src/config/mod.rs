//! Configuration module for the Campus Votes service.
//! Defines environment-driven settings, seed data and dependency wiring.
mod dependencies;
mod seed;
mod settings;

pub use dependencies::Dependencies;
pub use seed::{SeedData, SeedEntity, SeedSession};
pub use settings::{AppConfig, LogFormat};
