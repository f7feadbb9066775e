//! Error types for the storage layer.
//! Defines specific errors that can occur while reading or writing entities,
//! votes, comments, users and sessions.
use campus_votes_shared::types::{CommentId, EntityId, UserId};
use thiserror::Error;

/// Represents errors that can occur within a repository.
///
/// Besides backend failures this includes the conditions a caller is expected
/// to react to, such as a stale vote read or a missing row.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    #[error("Duplicate comment for entity {entity_id} and author {author_id}")]
    DuplicateComment { entity_id: EntityId, author_id: UserId },

    #[error("Stale vote for user {user_id} on entity {entity_id}")]
    StaleVote { user_id: UserId, entity_id: EntityId },

    #[error("Tally underflow on entity {0}")]
    TallyUnderflow(EntityId),

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(i16),

    #[error("Invalid comment origin: {0}")]
    InvalidOrigin(i16),

    #[error("Invalid entity kind: {0}")]
    InvalidEntityKind(i16),

    #[error("Invalid tally value: {0}")]
    InvalidTally(i64),
}
