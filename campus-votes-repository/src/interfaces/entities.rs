use campus_votes_shared::types::{EntityId, VoteableEntity};
use crate::errors::RepositoryError;

/// Trait for reading and creating voteable entities (campuses and communities).
///
/// Tallies are only changed through `VotesRepository::apply_vote_change`.
#[async_trait::async_trait]
pub trait EntitiesRepository: Send + Sync {
    async fn get_entity(&self, id: EntityId) -> Result<Option<VoteableEntity>, RepositoryError>;

    /// Stores a new entity. Its tally is persisted as given, normally all zero.
    async fn create_entity(&self, entity: &VoteableEntity) -> Result<(), RepositoryError>;
}
