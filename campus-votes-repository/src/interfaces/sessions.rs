use campus_votes_shared::types::UserId;
use chrono::{DateTime, Utc};
use crate::errors::RepositoryError;

/// Trait for resolving bearer tokens issued elsewhere in the platform.
///
/// This service never issues tokens over its API; `insert_session` exists for
/// seeding and tests.
#[async_trait::async_trait]
pub trait SessionsRepository: Send + Sync {
    /// Resolves `token` to the user it was issued for.
    ///
    /// Returns `None` for unknown or expired tokens.
    async fn resolve_session(&self, token: &str) -> Result<Option<UserId>, RepositoryError>;

    async fn insert_session(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError>;
}
