use campus_votes_shared::types::{UserId, UserProfile};
use crate::errors::RepositoryError;

/// Trait for looking up the user profiles that act on entities.
#[async_trait::async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError>;

    /// Fetches several profiles at once. Unknown ids are skipped.
    async fn get_users(&self, ids: &[UserId]) -> Result<Vec<UserProfile>, RepositoryError>;

    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), RepositoryError>;
}
