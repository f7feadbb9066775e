//! Error types for the Campus Votes service.
//! `ServerError` covers startup and wiring; `ApiError` is what handlers return
//! and knows how to render itself as an HTTP response.
mod api;

pub use api::ApiError;

use campus_votes_repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Seed error: {0}")]
    Seed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}
