//! This module defines the `VotingService`, the entry point that sequences the
//! cooldown gate, the vote ledger and the comment reconciler for each action.
use std::sync::Arc;

use campus_votes_repository::{
    CommentsRepository, EntitiesRepository, UsersRepository, VotesRepository,
};
use campus_votes_shared::types::{
    ActionKind, CommentId, CommentView, EntityId, InvalidPolarity, Polarity, Tally, UserId,
    VoteableEntity,
};
use tracing::{info, instrument};

use crate::cooldown::{CooldownDecision, CooldownLedger};
use crate::errors::EngineError;
use crate::ledger::VoteLedger;
use crate::locks::KeyedLocks;
use crate::reconciler::{CommentReconciler, validate_content};

/// Result of a successful vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub tally: Tally,
    pub actor_polarity: Polarity,
    pub comment: CommentView,
}

/// `VotingService` runs the voting and commenting actions of authenticated
/// actors.
///
/// Every mutating action passes the cooldown gate first. Work on one
/// (actor, entity) pair is serialized by a keyed lock, while different actors
/// proceed in parallel.
pub struct VotingService {
    cooldown: Arc<dyn CooldownLedger>,
    locks: KeyedLocks<(UserId, EntityId)>,
    ledger: VoteLedger,
    reconciler: CommentReconciler,
    entities: Arc<dyn EntitiesRepository>,
}

impl VotingService {
    /// Creates a new `VotingService` instance.
    ///
    /// # Arguments
    ///
    /// * `cooldown` - Ledger gating every mutating action
    /// * `entities` - Store of voteable entities
    /// * `votes` - Store of per-user votes
    /// * `comments` - Store of comments
    /// * `users` - Store of user profiles
    pub fn new(
        cooldown: Arc<dyn CooldownLedger>,
        entities: Arc<dyn EntitiesRepository>,
        votes: Arc<dyn VotesRepository>,
        comments: Arc<dyn CommentsRepository>,
        users: Arc<dyn UsersRepository>,
    ) -> Self {
        Self {
            cooldown,
            locks: KeyedLocks::new(),
            ledger: VoteLedger::new(entities.clone(), users.clone(), votes),
            reconciler: CommentReconciler::new(comments, users),
            entities,
        }
    }

    /// Creates a service whose repositories are all backed by `store`.
    pub fn with_store<S>(cooldown: Arc<dyn CooldownLedger>, store: Arc<S>) -> Self
    where
        S: EntitiesRepository
            + VotesRepository
            + CommentsRepository
            + UsersRepository
            + 'static,
    {
        Self::new(cooldown, store.clone(), store.clone(), store.clone(), store)
    }

    /// Casts a vote and synchronizes the actor's comment with it.
    ///
    /// `polarity` is the raw value from the request and is parsed before the
    /// cooldown is consulted, so a malformed request does not start a window.
    ///
    /// # Returns
    ///
    /// * `Ok(VoteOutcome)` - The updated tally and the actor's comment
    /// * `Err(EngineError::Validation)` - `polarity` is not recognized
    /// * `Err(EngineError::RateLimited)` - The actor voted too recently
    /// * `Err(EngineError::NotFound)` - The entity or the actor does not exist
    #[instrument(skip_all, fields(actor_id = %actor_id, entity_id = %entity_id))]
    pub async fn cast_vote(
        &self,
        actor_id: UserId,
        entity_id: EntityId,
        polarity: &str,
    ) -> Result<VoteOutcome, EngineError> {
        let polarity: Polarity = polarity
            .parse()
            .map_err(|e: InvalidPolarity| EngineError::validation(e.to_string()))?;

        self.gate(actor_id, ActionKind::Vote).await?;

        let _guard = self.locks.lock((actor_id, entity_id)).await;
        let receipt = self.ledger.cast_vote(actor_id, entity_id, polarity).await?;
        let comment = self
            .reconciler
            .sync(entity_id, actor_id, polarity, None)
            .await?;

        info!(
            previous = ?receipt.previous,
            polarity = %polarity,
            positive = receipt.tally.positive,
            neutral = receipt.tally.neutral,
            negative = receipt.tally.negative,
            "Vote cast"
        );

        Ok(VoteOutcome {
            tally: receipt.tally,
            actor_polarity: polarity,
            comment,
        })
    }

    /// Writes the actor's own comment on an entity they have voted on.
    ///
    /// The comment takes the actor's current polarity and stops following
    /// later vote switches.
    ///
    /// # Returns
    ///
    /// * `Err(EngineError::Validation)` - The content is empty or too long
    /// * `Err(EngineError::RateLimited)` - The actor commented too recently
    /// * `Err(EngineError::NotFound)` - The entity does not exist
    /// * `Err(EngineError::Forbidden)` - The actor has not voted on the entity
    #[instrument(skip_all, fields(actor_id = %actor_id, entity_id = %entity_id))]
    pub async fn post_comment(
        &self,
        actor_id: UserId,
        entity_id: EntityId,
        content: &str,
    ) -> Result<CommentView, EngineError> {
        let content = validate_content(content)?;

        self.gate(actor_id, ActionKind::Comment).await?;

        if self.entities.get_entity(entity_id).await?.is_none() {
            return Err(EngineError::not_found(format!("entity {entity_id}")));
        }

        let _guard = self.locks.lock((actor_id, entity_id)).await;
        let polarity = self
            .ledger
            .current_polarity(actor_id, entity_id)
            .await?
            .ok_or_else(|| EngineError::forbidden("vote on the entity before commenting"))?;

        let comment = self
            .reconciler
            .sync(entity_id, actor_id, polarity, Some(&content))
            .await?;
        info!(comment_id = %comment.id, "Comment posted");
        Ok(comment)
    }

    /// Replaces the content of one of the actor's user-authored comments.
    ///
    /// # Returns
    ///
    /// * `Err(EngineError::Validation)` - The content is empty or too long
    /// * `Err(EngineError::RateLimited)` - The actor commented too recently
    /// * `Err(EngineError::NotFound)` - The comment does not exist
    /// * `Err(EngineError::Forbidden)` - The actor is not the author, or the
    ///   comment still follows the vote
    #[instrument(skip_all, fields(actor_id = %actor_id, comment_id = %comment_id))]
    pub async fn edit_comment(
        &self,
        actor_id: UserId,
        comment_id: CommentId,
        content: &str,
    ) -> Result<CommentView, EngineError> {
        let content = validate_content(content)?;

        self.gate(actor_id, ActionKind::Comment).await?;

        let comment = self.reconciler.load_editable(actor_id, comment_id).await?;
        let _guard = self.locks.lock((actor_id, comment.entity_id)).await;
        // Re-checked under the lock: a concurrent sync may have removed it.
        self.reconciler.edit(actor_id, comment_id, &content).await
    }

    /// Returns an entity with its current tally.
    pub async fn entity_summary(&self, entity_id: EntityId) -> Result<VoteableEntity, EngineError> {
        self.entities
            .get_entity(entity_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("entity {entity_id}")))
    }

    /// Returns every comment on an entity with its author, oldest first.
    pub async fn list_comments(&self, entity_id: EntityId) -> Result<Vec<CommentView>, EngineError> {
        self.entity_summary(entity_id).await?;
        self.reconciler.list(entity_id).await
    }

    async fn gate(&self, actor_id: UserId, action: ActionKind) -> Result<(), EngineError> {
        match self.cooldown.check(actor_id, &action).await {
            CooldownDecision::Allow => Ok(()),
            CooldownDecision::Deny { remaining_secs } => {
                info!(
                    actor_id = %actor_id,
                    action = %action,
                    remaining_secs,
                    "Action rejected by cooldown"
                );
                Err(EngineError::RateLimited {
                    action,
                    remaining_secs,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooldown::{CooldownConfig, InMemoryCooldownLedger};
    use campus_votes_repository::InMemoryStore;
    use campus_votes_shared::types::{EntityKind, UserProfile};
    use std::time::Duration;
    use uuid::Uuid;

    async fn setup(config: CooldownConfig) -> (Arc<InMemoryStore>, VotingService, EntityId, UserId) {
        let store = Arc::new(InMemoryStore::new());
        let entity = VoteableEntity::new(Uuid::new_v4(), EntityKind::Community, "Robotics");
        store.create_entity(&entity).await.unwrap();
        let actor = UserProfile {
            id: Uuid::new_v4(),
            display_name: "Grace".to_string(),
            avatar_url: None,
        };
        store.upsert_user(&actor).await.unwrap();
        let cooldown = Arc::new(InMemoryCooldownLedger::new(config));
        let service = VotingService::with_store(cooldown, store.clone());
        (store, service, entity.id, actor.id)
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_vote_inside_window_is_rate_limited() {
        let (_store, service, entity_id, actor) = setup(CooldownConfig::default()).await;

        service.cast_vote(actor, entity_id, "positive").await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        match service.cast_vote(actor, entity_id, "negative").await {
            Err(EngineError::RateLimited { action, remaining_secs }) => {
                assert_eq!(action, ActionKind::Vote);
                assert_eq!(remaining_secs, 3);
            }
            other => panic!("expected rate limit, got {other:?}"),
        }

        tokio::time::advance(Duration::from_secs(3)).await;
        let outcome = service.cast_vote(actor, entity_id, "negative").await.unwrap();
        assert_eq!(outcome.tally, Tally { positive: 0, neutral: 0, negative: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_polarity_does_not_start_cooldown() {
        let (_store, service, entity_id, actor) = setup(CooldownConfig::default()).await;

        let result = service.cast_vote(actor, entity_id, "sideways").await;
        assert!(matches!(result, Err(EngineError::Validation(_))));

        let outcome = service.cast_vote(actor, entity_id, " Neutral ").await.unwrap();
        assert_eq!(outcome.actor_polarity, Polarity::Neutral);
    }

    #[tokio::test(start_paused = true)]
    async fn test_comment_requires_vote() {
        let (_store, service, entity_id, actor) = setup(CooldownConfig::default()).await;

        let result = service.post_comment(actor, entity_id, "hello").await;
        assert!(matches!(result, Err(EngineError::Forbidden(_))));

        let result = service.post_comment(actor, Uuid::new_v4(), "hello").await;
        assert!(matches!(result, Err(EngineError::RateLimited { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_comment_on_missing_entity() {
        let (_store, service, _entity_id, actor) = setup(CooldownConfig::default()).await;

        let result = service.post_comment(actor, Uuid::new_v4(), "hello").await;
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_posted_comment_takes_current_polarity() {
        let (store, service, entity_id, actor) = setup(CooldownConfig::default()).await;
        service.cast_vote(actor, entity_id, "negative").await.unwrap();

        let comment = service
            .post_comment(actor, entity_id, "  the lab is always locked  ")
            .await
            .unwrap();

        assert_eq!(comment.content, "the lab is always locked");
        assert_eq!(comment.vote_type, Polarity::Negative);
        assert_eq!(store.find_comments(entity_id, actor).await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_is_rate_limited_with_comments() {
        let (_store, service, entity_id, actor) = setup(CooldownConfig::default()).await;
        service.cast_vote(actor, entity_id, "positive").await.unwrap();
        let comment = service.post_comment(actor, entity_id, "ok").await.unwrap();

        let result = service.edit_comment(actor, comment.id, "better").await;
        assert!(matches!(
            result,
            Err(EngineError::RateLimited { action: ActionKind::Comment, .. })
        ));

        tokio::time::advance(Duration::from_secs(20)).await;
        let edited = service.edit_comment(actor, comment.id, "better").await.unwrap();
        assert_eq!(edited.content, "better");
    }

    #[tokio::test]
    async fn test_reads_report_missing_entity() {
        let (_store, service, entity_id, _actor) = setup(CooldownConfig::default()).await;

        assert_eq!(service.entity_summary(entity_id).await.unwrap().tally, Tally::default());
        assert!(service.list_comments(entity_id).await.unwrap().is_empty());
        assert!(matches!(
            service.list_comments(Uuid::new_v4()).await,
            Err(EngineError::NotFound(_))
        ));
    }
}
