//! This module defines the `VoteLedger`, which records each user's polarity per
//! voteable entity and keeps the entity's tally in step with it.
use std::sync::Arc;

use campus_votes_repository::{
    EntitiesRepository, RepositoryError, UsersRepository, VotesRepository,
};
use campus_votes_shared::types::{EntityId, Polarity, Tally, UserId, VoteChange};
use chrono::Utc;
use tracing::{debug, warn};

use crate::errors::EngineError;

/// How many times a cast re-reads the stored vote after losing a
/// compare-and-swap before giving up.
const MAX_CAST_ATTEMPTS: usize = 3;

/// Result of a successful vote cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteReceipt {
    pub tally: Tally,
    pub previous: Option<Polarity>,
    pub polarity: Polarity,
}

/// `VoteLedger` applies vote casts to the per-user vote records and the entity
/// tallies.
///
/// Each user contributes exactly one unit to exactly one bucket of an entity's
/// tally. Callers are expected to hold the (user, entity) lock while casting.
pub struct VoteLedger {
    entities: Arc<dyn EntitiesRepository>,
    users: Arc<dyn UsersRepository>,
    votes: Arc<dyn VotesRepository>,
}

impl VoteLedger {
    /// Creates a new `VoteLedger` instance.
    ///
    /// # Arguments
    ///
    /// * `entities` - Store holding the voteable entities and their tallies
    /// * `users` - Store used to check that the actor exists
    /// * `votes` - Store holding per-user vote records
    pub fn new(
        entities: Arc<dyn EntitiesRepository>,
        users: Arc<dyn UsersRepository>,
        votes: Arc<dyn VotesRepository>,
    ) -> Self {
        Self {
            entities,
            users,
            votes,
        }
    }

    /// Casts `polarity` for `actor_id` on `entity_id`.
    ///
    /// A first vote adds one unit to the polarity's bucket; a switch moves the
    /// actor's unit from the old bucket to the new one. Re-casting the same
    /// polarity leaves the tally unchanged and still succeeds.
    ///
    /// # Returns
    ///
    /// * `Ok(VoteReceipt)` - The updated tally and the actor's previous polarity
    /// * `Err(EngineError::NotFound)` - The entity or the actor does not exist
    /// * `Err(EngineError::Storage)` - Persistence failed
    pub async fn cast_vote(
        &self,
        actor_id: UserId,
        entity_id: EntityId,
        polarity: Polarity,
    ) -> Result<VoteReceipt, EngineError> {
        if self.entities.get_entity(entity_id).await?.is_none() {
            return Err(EngineError::not_found(format!("entity {entity_id}")));
        }
        if self.users.get_user(actor_id).await?.is_none() {
            return Err(EngineError::not_found(format!("user {actor_id}")));
        }

        for attempt in 1..=MAX_CAST_ATTEMPTS {
            let previous = self
                .votes
                .get_user_vote(actor_id, entity_id)
                .await?
                .map(|vote| vote.polarity);

            let change = VoteChange {
                user_id: actor_id,
                entity_id,
                previous,
                current: polarity,
                voted_at: Utc::now(),
            };

            match self.votes.apply_vote_change(&change).await {
                Ok(tally) => {
                    debug!(
                        actor_id = %actor_id,
                        entity_id = %entity_id,
                        previous = ?previous,
                        polarity = %polarity,
                        "Vote applied"
                    );
                    return Ok(VoteReceipt {
                        tally,
                        previous,
                        polarity,
                    });
                }
                Err(RepositoryError::StaleVote { .. }) => {
                    warn!(
                        actor_id = %actor_id,
                        entity_id = %entity_id,
                        attempt,
                        "Stored vote changed while casting, retrying"
                    );
                }
                Err(RepositoryError::EntityNotFound(_)) => {
                    return Err(EngineError::not_found(format!("entity {entity_id}")));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(RepositoryError::StaleVote {
            user_id: actor_id,
            entity_id,
        }
        .into())
    }

    /// Returns the polarity `actor_id` currently holds on `entity_id`.
    pub async fn current_polarity(
        &self,
        actor_id: UserId,
        entity_id: EntityId,
    ) -> Result<Option<Polarity>, EngineError> {
        Ok(self
            .votes
            .get_user_vote(actor_id, entity_id)
            .await?
            .map(|vote| vote.polarity))
    }
}
