//! Campus Votes Library
//!
//! This library provides the HTTP service around the voting engine, including
//! configuration management, error handling, dependency injection, tracing
//! setup and the axum router.

pub mod config;
pub mod errors;
pub mod server;
pub mod telemetry;

pub use config::{AppConfig, Dependencies};
pub use errors::{ApiError, ServerError};
