//! This module defines the `VotesRepository` trait, which stores per-user vote
//! records and the tallies they feed.
use campus_votes_shared::types::{EntityId, Tally, UserId, UserVote, VoteChange};
use crate::errors::RepositoryError;

/// A trait that defines the interface for per-user votes and entity tallies.
///
/// Vote records and tallies are written together so that the tally of an
/// entity always equals the number of distinct users holding a vote on it.
#[async_trait::async_trait]
pub trait VotesRepository: Send + Sync {
    /// Returns the vote `user_id` holds on `entity_id`, if any.
    async fn get_user_vote(
        &self,
        user_id: UserId,
        entity_id: EntityId,
    ) -> Result<Option<UserVote>, RepositoryError>;

    /// Atomically persists a vote switch and applies its delta to the tally.
    ///
    /// The change is a compare-and-swap on the user's stored polarity: it is
    /// applied only if the stored polarity still equals `change.previous`
    /// (`None` meaning no vote is stored yet).
    ///
    /// # Arguments
    ///
    /// * `change` - The switch read and computed by the caller.
    ///
    /// # Returns
    ///
    /// * `Ok(Tally)` - The entity's tally after the change
    /// * `Err(RepositoryError::StaleVote)` - The stored polarity moved since it was read
    /// * `Err(RepositoryError::EntityNotFound)` - The entity does not exist
    async fn apply_vote_change(&self, change: &VoteChange) -> Result<Tally, RepositoryError>;
}
