//! In-memory implementation of every repository trait.
//!
//! All state lives behind one mutex, which makes each trait method atomic with
//! respect to every other one. The lock is never held across an await point.
//! Used for tests, local development and single-instance deployments without
//! a database.
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use campus_votes_shared::types::{
    Comment, CommentId, EntityId, Tally, UserId, UserProfile, UserVote, VoteChange,
    VoteableEntity,
};
use chrono::{DateTime, Utc};

use crate::errors::RepositoryError;
use crate::interfaces::{
    CommentsRepository, EntitiesRepository, SessionsRepository, UsersRepository,
    VotesRepository,
};

#[derive(Default)]
struct MemoryState {
    entities: HashMap<EntityId, VoteableEntity>,
    votes: HashMap<(UserId, EntityId), UserVote>,
    comments: Vec<Comment>,
    users: HashMap<UserId, UserProfile>,
    sessions: HashMap<String, (UserId, Option<DateTime<Utc>>)>,
}

/// Process-local store backing all repositories.
///
/// Comments are kept in insertion order and duplicates for one
/// (entity, author) pair are accepted, which lets tests model legacy data.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn sort_oldest_first(comments: &mut [Comment]) {
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl EntitiesRepository for InMemoryStore {
    async fn get_entity(&self, id: EntityId) -> Result<Option<VoteableEntity>, RepositoryError> {
        Ok(self.state().entities.get(&id).cloned())
    }

    async fn create_entity(&self, entity: &VoteableEntity) -> Result<(), RepositoryError> {
        self.state().entities.insert(entity.id, entity.clone());
        Ok(())
    }
}

#[async_trait]
impl VotesRepository for InMemoryStore {
    async fn get_user_vote(
        &self,
        user_id: UserId,
        entity_id: EntityId,
    ) -> Result<Option<UserVote>, RepositoryError> {
        Ok(self.state().votes.get(&(user_id, entity_id)).cloned())
    }

    async fn apply_vote_change(&self, change: &VoteChange) -> Result<Tally, RepositoryError> {
        let mut state = self.state();
        let key = (change.user_id, change.entity_id);

        let stored = state.votes.get(&key).map(|vote| vote.polarity);
        if stored != change.previous {
            return Err(RepositoryError::StaleVote {
                user_id: change.user_id,
                entity_id: change.entity_id,
            });
        }

        let entity = state
            .entities
            .get_mut(&change.entity_id)
            .ok_or(RepositoryError::EntityNotFound(change.entity_id))?;
        let tally = entity
            .tally
            .checked_apply(&change.delta())
            .ok_or(RepositoryError::TallyUnderflow(change.entity_id))?;
        entity.tally = tally;

        state.votes.insert(key, change.as_user_vote());
        Ok(tally)
    }
}

#[async_trait]
impl CommentsRepository for InMemoryStore {
    async fn find_comments(
        &self,
        entity_id: EntityId,
        author_id: UserId,
    ) -> Result<Vec<Comment>, RepositoryError> {
        let mut found: Vec<Comment> = self
            .state()
            .comments
            .iter()
            .filter(|c| c.entity_id == entity_id && c.author_id == author_id)
            .cloned()
            .collect();
        sort_oldest_first(&mut found);
        Ok(found)
    }

    async fn list_comments(&self, entity_id: EntityId) -> Result<Vec<Comment>, RepositoryError> {
        let mut found: Vec<Comment> = self
            .state()
            .comments
            .iter()
            .filter(|c| c.entity_id == entity_id)
            .cloned()
            .collect();
        sort_oldest_first(&mut found);
        Ok(found)
    }

    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        Ok(self.state().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), RepositoryError> {
        self.state().comments.push(comment.clone());
        Ok(())
    }

    async fn update_comment(&self, comment: &Comment) -> Result<(), RepositoryError> {
        let mut state = self.state();
        let stored = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(RepositoryError::CommentNotFound(comment.id))?;
        stored.content = comment.content.clone();
        stored.vote_type = comment.vote_type;
        stored.origin = comment.origin;
        stored.likes = comment.likes.clone();
        stored.updated_at = comment.updated_at;
        Ok(())
    }

    async fn delete_comments(&self, ids: &[CommentId]) -> Result<u64, RepositoryError> {
        let mut state = self.state();
        let before = state.comments.len();
        state.comments.retain(|c| !ids.contains(&c.id));
        Ok((before - state.comments.len()) as u64)
    }
}

#[async_trait]
impl UsersRepository for InMemoryStore {
    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.state().users.get(&id).cloned())
    }

    async fn get_users(&self, ids: &[UserId]) -> Result<Vec<UserProfile>, RepositoryError> {
        let state = self.state();
        Ok(ids.iter().filter_map(|id| state.users.get(id).cloned()).collect())
    }

    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        self.state().users.insert(profile.id, profile.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionsRepository for InMemoryStore {
    async fn resolve_session(&self, token: &str) -> Result<Option<UserId>, RepositoryError> {
        let state = self.state();
        Ok(state.sessions.get(token).and_then(|(user_id, expires_at)| {
            match expires_at {
                Some(expires_at) if *expires_at <= Utc::now() => None,
                _ => Some(*user_id),
            }
        }))
    }

    async fn insert_session(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        self.state()
            .sessions
            .insert(token.to_string(), (user_id, expires_at));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_votes_shared::types::{EntityKind, Polarity};
    use chrono::Duration;
    use uuid::Uuid;

    async fn store_with_entity() -> (InMemoryStore, EntityId) {
        let store = InMemoryStore::new();
        let entity = VoteableEntity::new(Uuid::new_v4(), EntityKind::Campus, "North Campus");
        store.create_entity(&entity).await.unwrap();
        (store, entity.id)
    }

    fn change(user_id: UserId, entity_id: EntityId, previous: Option<Polarity>, current: Polarity) -> VoteChange {
        VoteChange { user_id, entity_id, previous, current, voted_at: Utc::now() }
    }

    #[tokio::test]
    async fn test_apply_first_vote_creates_record_and_counts() {
        let (store, entity_id) = store_with_entity().await;
        let user_id = Uuid::new_v4();

        let tally = store
            .apply_vote_change(&change(user_id, entity_id, None, Polarity::Positive))
            .await
            .unwrap();

        assert_eq!(tally, Tally { positive: 1, neutral: 0, negative: 0 });
        let vote = store.get_user_vote(user_id, entity_id).await.unwrap().unwrap();
        assert_eq!(vote.polarity, Polarity::Positive);
    }

    #[tokio::test]
    async fn test_apply_rejects_stale_previous() {
        let (store, entity_id) = store_with_entity().await;
        let user_id = Uuid::new_v4();
        store
            .apply_vote_change(&change(user_id, entity_id, None, Polarity::Positive))
            .await
            .unwrap();

        let result = store
            .apply_vote_change(&change(user_id, entity_id, None, Polarity::Negative))
            .await;

        assert!(matches!(result, Err(RepositoryError::StaleVote { .. })));
        let entity = store.get_entity(entity_id).await.unwrap().unwrap();
        assert_eq!(entity.tally.total(), 1);
    }

    #[tokio::test]
    async fn test_apply_on_missing_entity() {
        let store = InMemoryStore::new();
        let result = store
            .apply_vote_change(&change(Uuid::new_v4(), Uuid::new_v4(), None, Polarity::Neutral))
            .await;
        assert!(matches!(result, Err(RepositoryError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_comments_returns_oldest_first() {
        let (store, entity_id) = store_with_entity().await;
        let author = Uuid::new_v4();
        let mut newer = Comment::authored(entity_id, author, Polarity::Positive, "second");
        let older = Comment::authored(entity_id, author, Polarity::Positive, "first");
        newer.created_at = older.created_at + Duration::seconds(5);

        store.insert_comment(&newer).await.unwrap();
        store.insert_comment(&older).await.unwrap();
        store
            .insert_comment(&Comment::authored(entity_id, Uuid::new_v4(), Polarity::Neutral, "other"))
            .await
            .unwrap();

        let found = store.find_comments(entity_id, author).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, older.id);
        assert_eq!(found[1].id, newer.id);
    }

    #[tokio::test]
    async fn test_delete_comments_counts_existing_only() {
        let (store, entity_id) = store_with_entity().await;
        let comment = Comment::authored(entity_id, Uuid::new_v4(), Polarity::Positive, "hi");
        store.insert_comment(&comment).await.unwrap();

        let deleted = store.delete_comments(&[comment.id, Uuid::new_v4()]).await.unwrap();

        assert_eq!(deleted, 1);
        assert!(store.get_comment(comment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_comment() {
        let store = InMemoryStore::new();
        let comment = Comment::authored(Uuid::new_v4(), Uuid::new_v4(), Polarity::Positive, "hi");
        let result = store.update_comment(&comment).await;
        assert!(matches!(result, Err(RepositoryError::CommentNotFound(_))));
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        store.insert_session("live", user_id, None).await.unwrap();
        store
            .insert_session("expired", user_id, Some(Utc::now() - Duration::minutes(1)))
            .await
            .unwrap();

        assert_eq!(store.resolve_session("live").await.unwrap(), Some(user_id));
        assert_eq!(store.resolve_session("expired").await.unwrap(), None);
        assert_eq!(store.resolve_session("unknown").await.unwrap(), None);
    }
}
