//! Error types for the voting engine.
//! Defines the taxonomy callers map onto their transport, from authentication
//! failures to storage faults.
use campus_votes_repository::RepositoryError;
use campus_votes_shared::types::ActionKind;
use thiserror::Error;

/// Represents errors that can occur while handling a vote or comment action.
///
/// Only `RateLimited` and `Validation` carry detail meant for end users;
/// `Storage` wraps backend failures that should be logged and reported
/// generically.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Cooldown active for {action}, retry in {remaining_secs}s")]
    RateLimited { action: ActionKind, remaining_secs: u64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl EngineError {
    /// Create an unauthorized error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a forbidden error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}
