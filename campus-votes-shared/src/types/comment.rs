use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::types::{AuthorSummary, CommentId, EntityId, Polarity, UserId};

/// Maximum number of characters accepted in user-written comment content.
pub const MAX_COMMENT_CHARS: usize = 1000;

/// Who wrote the current content of a comment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommentOrigin {
    /// Content is a system template and follows the author's vote.
    System,
    /// Content was written by the author and survives vote switches.
    User,
}

impl CommentOrigin {
    /// Classifies content stored without an origin.
    ///
    /// Rows written before the origin was recorded are auto-tracking exactly
    /// when their content equals one of the system templates.
    pub fn infer(content: &str) -> Self {
        if Polarity::is_system_template(content) {
            CommentOrigin::System
        } else {
            CommentOrigin::User
        }
    }

    pub fn as_i16(self) -> i16 {
        match self {
            CommentOrigin::System => 0,
            CommentOrigin::User => 1,
        }
    }

    pub fn from_i16(code: i16) -> Option<Self> {
        match code {
            0 => Some(CommentOrigin::System),
            1 => Some(CommentOrigin::User),
            _ => None,
        }
    }
}

/// A comment left by a voter on a voteable entity.
///
/// The entity is only referenced by id. Each (entity, author) pair is meant to
/// have exactly one comment, and `vote_type` mirrors the author's polarity at
/// the time the comment was last written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub entity_id: EntityId,
    pub author_id: UserId,
    pub content: String,
    pub vote_type: Polarity,
    pub origin: CommentOrigin,
    pub likes: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment holding the system template for `polarity`.
    pub fn from_template(entity_id: EntityId, author_id: UserId, polarity: Polarity) -> Self {
        Self::new(
            entity_id,
            author_id,
            polarity,
            polarity.system_template().to_string(),
            CommentOrigin::System,
        )
    }

    /// Creates a comment holding text written by its author.
    pub fn authored(
        entity_id: EntityId,
        author_id: UserId,
        polarity: Polarity,
        content: impl Into<String>,
    ) -> Self {
        Self::new(entity_id, author_id, polarity, content.into(), CommentOrigin::User)
    }

    fn new(
        entity_id: EntityId,
        author_id: UserId,
        polarity: Polarity,
        content: String,
        origin: CommentOrigin,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CommentId::new_v4(),
            entity_id,
            author_id,
            content,
            vote_type: polarity,
            origin,
            likes: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the content follows the author's vote.
    pub fn is_auto_tracking(&self) -> bool {
        self.origin == CommentOrigin::System
    }
}

/// A comment joined with its author's display fields, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: CommentId,
    pub entity_id: EntityId,
    pub content: String,
    pub vote_type: Polarity,
    pub origin: CommentOrigin,
    pub like_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
}

impl CommentView {
    pub fn new(comment: Comment, author: AuthorSummary) -> Self {
        Self {
            id: comment.id,
            entity_id: comment.entity_id,
            like_count: comment.likes.len(),
            content: comment.content,
            vote_type: comment.vote_type,
            origin: comment.origin,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            author,
        }
    }
}
