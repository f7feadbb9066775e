//! This module defines the `CommentReconciler`, which keeps exactly one comment
//! per (entity, author) pair and decides whether a vote switch rewrites it.
use std::sync::Arc;

use campus_votes_repository::{CommentsRepository, RepositoryError, UsersRepository};
use campus_votes_shared::types::{
    AuthorSummary, Comment, CommentId, CommentOrigin, CommentView, EntityId, MAX_COMMENT_CHARS,
    Polarity, UserId,
};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::EngineError;

/// Trims `raw` and checks it against the comment length rules.
///
/// # Returns
///
/// * `Ok(String)` - The trimmed content
/// * `Err(EngineError::Validation)` - The content is empty or too long
pub fn validate_content(raw: &str) -> Result<String, EngineError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(EngineError::validation("comment content must not be empty"));
    }
    let chars = content.chars().count();
    if chars > MAX_COMMENT_CHARS {
        return Err(EngineError::validation(format!(
            "comment content is {chars} characters, the limit is {MAX_COMMENT_CHARS}"
        )));
    }
    Ok(content.to_string())
}

/// `CommentReconciler` synchronizes an author's comment with their vote.
///
/// Comments created from a vote hold the system template of the vote's
/// polarity and follow later switches. Once the author writes their own
/// content, switches only update `vote_type`.
pub struct CommentReconciler {
    comments: Arc<dyn CommentsRepository>,
    users: Arc<dyn UsersRepository>,
}

impl CommentReconciler {
    pub fn new(comments: Arc<dyn CommentsRepository>, users: Arc<dyn UsersRepository>) -> Self {
        Self { comments, users }
    }

    /// Brings the comment of `actor_id` on `entity_id` in line with `polarity`.
    ///
    /// With `explicit` content the comment is overwritten with it and marked
    /// user-authored. Without it (a vote switch) an auto-tracking comment gets
    /// the template for `polarity` and a user-authored one keeps its content.
    /// Any comments beyond the oldest one for the pair are deleted.
    ///
    /// Callers must hold the (actor, entity) lock.
    pub async fn sync(
        &self,
        entity_id: EntityId,
        actor_id: UserId,
        polarity: Polarity,
        explicit: Option<&str>,
    ) -> Result<CommentView, EngineError> {
        let mut found = self.comments.find_comments(entity_id, actor_id).await?;

        if found.is_empty() {
            let comment = match explicit {
                Some(content) => Comment::authored(entity_id, actor_id, polarity, content),
                None => Comment::from_template(entity_id, actor_id, polarity),
            };
            match self.comments.insert_comment(&comment).await {
                Ok(()) => {
                    debug!(
                        comment_id = %comment.id,
                        entity_id = %entity_id,
                        actor_id = %actor_id,
                        origin = ?comment.origin,
                        "Comment created"
                    );
                    return self.view(comment).await;
                }
                Err(RepositoryError::DuplicateComment { .. }) => {
                    // Another writer created the pair's comment first; reconcile against it.
                    found = self.comments.find_comments(entity_id, actor_id).await?;
                    if found.is_empty() {
                        return Err(RepositoryError::DuplicateComment {
                            entity_id,
                            author_id: actor_id,
                        }
                        .into());
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        let mut canonical = found.remove(0);
        match explicit {
            Some(content) => {
                canonical.content = content.to_string();
                canonical.origin = CommentOrigin::User;
            }
            None if canonical.is_auto_tracking() => {
                canonical.content = polarity.system_template().to_string();
            }
            None => {}
        }
        canonical.vote_type = polarity;
        canonical.updated_at = Utc::now();
        self.comments.update_comment(&canonical).await?;

        if !found.is_empty() {
            let extra: Vec<CommentId> = found.iter().map(|c| c.id).collect();
            let removed = self.comments.delete_comments(&extra).await?;
            warn!(
                entity_id = %entity_id,
                actor_id = %actor_id,
                kept = %canonical.id,
                removed,
                "Removed duplicate comments"
            );
        }

        self.view(canonical).await
    }

    /// Replaces the content of a comment with text written by its author.
    ///
    /// `content` must already be validated.
    ///
    /// # Returns
    ///
    /// * `Err(EngineError::NotFound)` - No comment has `comment_id`
    /// * `Err(EngineError::Forbidden)` - `actor_id` is not the author, or the
    ///   comment still holds a system template
    pub async fn edit(
        &self,
        actor_id: UserId,
        comment_id: CommentId,
        content: &str,
    ) -> Result<CommentView, EngineError> {
        let mut comment = self.load_editable(actor_id, comment_id).await?;

        comment.content = content.to_string();
        comment.origin = CommentOrigin::User;
        comment.updated_at = Utc::now();
        self.comments.update_comment(&comment).await.map_err(|e| match e {
            RepositoryError::CommentNotFound(id) => EngineError::not_found(format!("comment {id}")),
            e => e.into(),
        })?;

        info!(comment_id = %comment_id, actor_id = %actor_id, "Comment edited");
        self.view(comment).await
    }

    /// Loads a comment and checks that `actor_id` may edit it.
    pub async fn load_editable(
        &self,
        actor_id: UserId,
        comment_id: CommentId,
    ) -> Result<Comment, EngineError> {
        let comment = self
            .comments
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("comment {comment_id}")))?;

        if comment.author_id != actor_id {
            return Err(EngineError::forbidden("only the author can edit this comment"));
        }
        if comment.is_auto_tracking() {
            return Err(EngineError::forbidden(
                "system generated comments follow the vote and cannot be edited",
            ));
        }
        Ok(comment)
    }

    /// Returns every comment on `entity_id` joined with its author, oldest first.
    pub async fn list(&self, entity_id: EntityId) -> Result<Vec<CommentView>, EngineError> {
        let comments = self.comments.list_comments(entity_id).await?;

        let mut author_ids: Vec<UserId> = comments.iter().map(|c| c.author_id).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors = self.users.get_users(&author_ids).await?;

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = authors
                    .iter()
                    .find(|profile| profile.id == comment.author_id)
                    .map(AuthorSummary::from)
                    .unwrap_or_else(|| AuthorSummary::unknown(comment.author_id));
                CommentView::new(comment, author)
            })
            .collect())
    }

    async fn view(&self, comment: Comment) -> Result<CommentView, EngineError> {
        let author = match self.users.get_user(comment.author_id).await? {
            Some(profile) => AuthorSummary::from(&profile),
            None => AuthorSummary::unknown(comment.author_id),
        };
        Ok(CommentView::new(comment, author))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_votes_repository::InMemoryStore;
    use campus_votes_shared::types::UserProfile;
    use chrono::Duration;
    use uuid::Uuid;

    async fn setup() -> (Arc<InMemoryStore>, CommentReconciler, EntityId, UserId) {
        let store = Arc::new(InMemoryStore::new());
        let actor = UserProfile {
            id: Uuid::new_v4(),
            display_name: "Ada".to_string(),
            avatar_url: Some("https://cdn.example/ada.png".to_string()),
        };
        store.upsert_user(&actor).await.unwrap();
        let reconciler = CommentReconciler::new(store.clone(), store.clone());
        (store, reconciler, Uuid::new_v4(), actor.id)
    }

    #[test]
    fn test_validate_content() {
        assert_eq!(validate_content("  great place \n").unwrap(), "great place");
        assert!(matches!(validate_content("   "), Err(EngineError::Validation(_))));
        assert!(validate_content(&"é".repeat(MAX_COMMENT_CHARS)).is_ok());
        assert!(matches!(
            validate_content(&"a".repeat(MAX_COMMENT_CHARS + 1)),
            Err(EngineError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_first_vote_creates_template_comment() {
        let (_store, reconciler, entity_id, actor) = setup().await;

        let view = reconciler.sync(entity_id, actor, Polarity::Positive, None).await.unwrap();

        assert_eq!(view.content, Polarity::Positive.system_template());
        assert_eq!(view.origin, CommentOrigin::System);
        assert_eq!(view.author.display_name, "Ada");
    }

    #[tokio::test]
    async fn test_template_follows_vote_until_edited() {
        let (store, reconciler, entity_id, actor) = setup().await;

        let created = reconciler.sync(entity_id, actor, Polarity::Positive, None).await.unwrap();
        let switched = reconciler.sync(entity_id, actor, Polarity::Negative, None).await.unwrap();
        assert_eq!(switched.id, created.id);
        assert_eq!(switched.content, Polarity::Negative.system_template());

        let explicit = reconciler
            .sync(entity_id, actor, Polarity::Negative, Some("too crowded"))
            .await
            .unwrap();
        assert_eq!(explicit.origin, CommentOrigin::User);

        let kept = reconciler.sync(entity_id, actor, Polarity::Positive, None).await.unwrap();
        assert_eq!(kept.content, "too crowded");
        assert_eq!(kept.vote_type, Polarity::Positive);
        assert_eq!(store.find_comments(entity_id, actor).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicates_are_removed_keeping_oldest() {
        let (store, reconciler, entity_id, actor) = setup().await;
        let mut oldest = Comment::authored(entity_id, actor, Polarity::Neutral, "first");
        oldest.created_at = Utc::now() - Duration::hours(2);
        let mut newer = Comment::from_template(entity_id, actor, Polarity::Neutral);
        newer.created_at = Utc::now() - Duration::hours(1);
        // Inserted newest first so insertion order is not what decides.
        store.insert_comment(&newer).await.unwrap();
        store.insert_comment(&oldest).await.unwrap();

        let view = reconciler.sync(entity_id, actor, Polarity::Negative, None).await.unwrap();

        assert_eq!(view.id, oldest.id);
        assert_eq!(view.content, "first");
        let remaining = store.find_comments(entity_id, actor).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, oldest.id);
    }

    #[tokio::test]
    async fn test_edit_rules() {
        let (store, reconciler, entity_id, actor) = setup().await;
        let auto = reconciler.sync(entity_id, actor, Polarity::Positive, None).await.unwrap();

        let result = reconciler.edit(actor, auto.id, "nice").await;
        assert!(matches!(result, Err(EngineError::Forbidden(_))));

        reconciler
            .sync(entity_id, actor, Polarity::Positive, Some("nice"))
            .await
            .unwrap();
        let result = reconciler.edit(Uuid::new_v4(), auto.id, "hijack").await;
        assert!(matches!(result, Err(EngineError::Forbidden(_))));

        let edited = reconciler.edit(actor, auto.id, "very nice").await.unwrap();
        assert_eq!(edited.content, "very nice");
        let stored = store.get_comment(auto.id).await.unwrap().unwrap();
        assert_eq!(stored.origin, CommentOrigin::User);

        let result = reconciler.edit(actor, Uuid::new_v4(), "nothing").await;
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_joins_authors() {
        let (store, reconciler, entity_id, actor) = setup().await;
        let stranger = Uuid::new_v4();
        reconciler.sync(entity_id, actor, Polarity::Positive, None).await.unwrap();
        let mut later = Comment::authored(entity_id, stranger, Polarity::Neutral, "hm");
        later.created_at = Utc::now() + Duration::seconds(1);
        store.insert_comment(&later).await.unwrap();

        let items = reconciler.list(entity_id).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].author.display_name, "Ada");
        assert_eq!(items[1].author.id, stranger);
    }
}
