//! This module defines the `CommentsRepository` trait, the storage interface
//! for comments left by voters on voteable entities.
use campus_votes_shared::types::{Comment, CommentId, EntityId, UserId};
use crate::errors::RepositoryError;

/// A trait that defines the interface for the comment store.
///
/// Stores are not required to reject a second comment for the same
/// (entity, author) pair, since legacy data may already contain such
/// duplicates. Callers repair them when they see them.
#[async_trait::async_trait]
pub trait CommentsRepository: Send + Sync {
    /// Returns every comment `author_id` has on `entity_id`.
    ///
    /// Results are ordered oldest first (creation time, then id) so that the
    /// first element is stable across calls.
    async fn find_comments(
        &self,
        entity_id: EntityId,
        author_id: UserId,
    ) -> Result<Vec<Comment>, RepositoryError>;

    /// Returns every comment on `entity_id`, oldest first.
    async fn list_comments(&self, entity_id: EntityId) -> Result<Vec<Comment>, RepositoryError>;

    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError>;

    /// Inserts a new comment.
    ///
    /// Stores that enforce one comment per (entity, author) return
    /// `RepositoryError::DuplicateComment` when the pair already has one.
    async fn insert_comment(&self, comment: &Comment) -> Result<(), RepositoryError>;

    /// Overwrites content, vote type, origin, likes and `updated_at` of an
    /// existing comment.
    async fn update_comment(&self, comment: &Comment) -> Result<(), RepositoryError>;

    /// Deletes the given comments, returning how many existed.
    async fn delete_comments(&self, ids: &[CommentId]) -> Result<u64, RepositoryError>;
}
