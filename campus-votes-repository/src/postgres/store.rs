use async_trait::async_trait;
use campus_votes_shared::types::{
    Comment, CommentId, CommentOrigin, EntityId, EntityKind, Polarity, Tally, UserId,
    UserProfile, UserVote, VoteChange, VoteableEntity,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::RepositoryError;
use crate::interfaces::{
    CommentsRepository, EntitiesRepository, SessionsRepository, UsersRepository,
    VotesRepository,
};

/// PostgreSQL implementation of every repository trait.
///
/// Provides database operations for entities, votes, comments, users and
/// sessions using a shared connection pool.
///
/// ## Features
///
/// - Vote switches run in one transaction: compare-and-swap on `user_votes`
///   followed by an in-place delta update of the entity's tally
/// - `PRIMARY KEY (user_id, entity_id)` on votes and a unique index on
///   `(entity_id, author_id)` on comments
/// - Embedded migrations via `sqlx::migrate!`
pub struct PostgresStore {
    pool: sqlx::PgPool,
}

#[derive(sqlx::FromRow)]
struct EntityRow {
    id: EntityId,
    kind: i16,
    name: String,
    positive: i64,
    neutral: i64,
    negative: i64,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TallyRow {
    positive: i64,
    neutral: i64,
    negative: i64,
}

#[derive(sqlx::FromRow)]
struct UserVoteRow {
    user_id: UserId,
    entity_id: EntityId,
    polarity: i16,
    voted_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: CommentId,
    entity_id: EntityId,
    author_id: UserId,
    content: String,
    vote_type: i16,
    origin: Option<i16>,
    likes: Vec<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    display_name: String,
    avatar_url: Option<String>,
}

const COMMENT_COLUMNS: &str =
    "id, entity_id, author_id, content, vote_type, origin, likes, created_at, updated_at";

fn count(value: i64) -> Result<u64, RepositoryError> {
    u64::try_from(value).map_err(|_| RepositoryError::InvalidTally(value))
}

impl TryFrom<TallyRow> for Tally {
    type Error = RepositoryError;

    fn try_from(row: TallyRow) -> Result<Self, Self::Error> {
        Ok(Tally {
            positive: count(row.positive)?,
            neutral: count(row.neutral)?,
            negative: count(row.negative)?,
        })
    }
}

impl TryFrom<EntityRow> for VoteableEntity {
    type Error = RepositoryError;

    fn try_from(row: EntityRow) -> Result<Self, Self::Error> {
        Ok(VoteableEntity {
            id: row.id,
            kind: EntityKind::from_i16(row.kind)
                .ok_or(RepositoryError::InvalidEntityKind(row.kind))?,
            name: row.name,
            tally: Tally::try_from(TallyRow {
                positive: row.positive,
                neutral: row.neutral,
                negative: row.negative,
            })?,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<UserVoteRow> for UserVote {
    type Error = RepositoryError;

    fn try_from(row: UserVoteRow) -> Result<Self, Self::Error> {
        Ok(UserVote {
            user_id: row.user_id,
            entity_id: row.entity_id,
            polarity: Polarity::try_from(row.polarity)
                .map_err(|_| RepositoryError::InvalidVoteType(row.polarity))?,
            voted_at: row.voted_at,
        })
    }
}

impl TryFrom<CommentRow> for Comment {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        let origin = match row.origin {
            Some(code) => CommentOrigin::from_i16(code).ok_or(RepositoryError::InvalidOrigin(code))?,
            None => CommentOrigin::infer(&row.content),
        };
        Ok(Comment {
            id: row.id,
            entity_id: row.entity_id,
            author_id: row.author_id,
            vote_type: Polarity::try_from(row.vote_type)
                .map_err(|_| RepositoryError::InvalidVoteType(row.vote_type))?,
            content: row.content,
            origin,
            likes: row.likes.into_iter().collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            id: row.id,
            display_name: row.display_name,
            avatar_url: row.avatar_url,
        }
    }
}

impl PostgresStore {
    /// Creates a new PostgreSQL store instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `url` and returns a store over a fresh pool.
    pub async fn connect(url: &str) -> Result<Self, RepositoryError> {
        let pool = sqlx::PgPool::connect(url).await?;
        Ok(Self { pool })
    }

    /// Applies the embedded migrations.
    ///
    /// The second migration removes duplicate comments (keeping the oldest
    /// of each pair) before creating the unique index.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}

#[async_trait]
impl EntitiesRepository for PostgresStore {
    async fn get_entity(&self, id: EntityId) -> Result<Option<VoteableEntity>, RepositoryError> {
        let row = sqlx::query_as::<_, EntityRow>(
            "SELECT id, kind, name, positive, neutral, negative, created_at FROM voteable_entities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VoteableEntity::try_from).transpose()
    }

    async fn create_entity(&self, entity: &VoteableEntity) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO voteable_entities (id, kind, name, positive, neutral, negative, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(entity.id)
        .bind(entity.kind.as_i16())
        .bind(&entity.name)
        .bind(entity.tally.positive as i64)
        .bind(entity.tally.neutral as i64)
        .bind(entity.tally.negative as i64)
        .bind(entity.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl VotesRepository for PostgresStore {
    async fn get_user_vote(
        &self,
        user_id: UserId,
        entity_id: EntityId,
    ) -> Result<Option<UserVote>, RepositoryError> {
        let row = sqlx::query_as::<_, UserVoteRow>(
            "SELECT user_id, entity_id, polarity, voted_at FROM user_votes WHERE user_id = $1 AND entity_id = $2",
        )
        .bind(user_id)
        .bind(entity_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserVote::try_from).transpose()
    }

    async fn apply_vote_change(&self, change: &VoteChange) -> Result<Tally, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let swapped = match change.previous {
            None => sqlx::query(
                "INSERT INTO user_votes (user_id, entity_id, polarity, voted_at) \
                 SELECT $1, $2, $3, $4 WHERE EXISTS (SELECT 1 FROM voteable_entities WHERE id = $2) \
                 ON CONFLICT (user_id, entity_id) DO NOTHING",
            )
            .bind(change.user_id)
            .bind(change.entity_id)
            .bind(change.current.as_i16())
            .bind(change.voted_at)
            .execute(&mut *tx)
            .await?
            .rows_affected(),
            Some(previous) => sqlx::query(
                "UPDATE user_votes SET polarity = $3, voted_at = $4 \
                 WHERE user_id = $1 AND entity_id = $2 AND polarity = $5",
            )
            .bind(change.user_id)
            .bind(change.entity_id)
            .bind(change.current.as_i16())
            .bind(change.voted_at)
            .bind(previous.as_i16())
            .execute(&mut *tx)
            .await?
            .rows_affected(),
        };

        if swapped != 1 {
            let entity_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM voteable_entities WHERE id = $1)",
            )
            .bind(change.entity_id)
            .fetch_one(&mut *tx)
            .await?;
            tx.rollback().await?;

            if !entity_exists {
                return Err(RepositoryError::EntityNotFound(change.entity_id));
            }
            debug!(user_id = %change.user_id, entity_id = %change.entity_id, "Vote compare-and-swap lost");
            return Err(RepositoryError::StaleVote {
                user_id: change.user_id,
                entity_id: change.entity_id,
            });
        }

        let delta = change.delta();
        let tally = sqlx::query_as::<_, TallyRow>(
            "UPDATE voteable_entities SET positive = positive + $2, neutral = neutral + $3, negative = negative + $4 \
             WHERE id = $1 RETURNING positive, neutral, negative",
        )
        .bind(change.entity_id)
        .bind(delta.positive)
        .bind(delta.neutral)
        .bind(delta.negative)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::EntityNotFound(change.entity_id))?;

        tx.commit().await?;
        Tally::try_from(tally)
    }
}

#[async_trait]
impl CommentsRepository for PostgresStore {
    async fn find_comments(
        &self,
        entity_id: EntityId,
        author_id: UserId,
    ) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE entity_id = $1 AND author_id = $2 ORDER BY created_at, id"
        ))
        .bind(entity_id)
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn list_comments(&self, entity_id: EntityId) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE entity_id = $1 ORDER BY created_at, id"
        ))
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Comment::try_from).transpose()
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), RepositoryError> {
        let likes: Vec<UserId> = comment.likes.iter().copied().collect();
        let result = sqlx::query(&format!(
            "INSERT INTO comments ({COMMENT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
        ))
        .bind(comment.id)
        .bind(comment.entity_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .bind(comment.vote_type.as_i16())
        .bind(comment.origin.as_i16())
        .bind(&likes)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RepositoryError::DuplicateComment {
                    entity_id: comment.entity_id,
                    author_id: comment.author_id,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_comment(&self, comment: &Comment) -> Result<(), RepositoryError> {
        let likes: Vec<UserId> = comment.likes.iter().copied().collect();
        let updated = sqlx::query(
            "UPDATE comments SET content = $2, vote_type = $3, origin = $4, likes = $5, updated_at = $6 WHERE id = $1",
        )
        .bind(comment.id)
        .bind(&comment.content)
        .bind(comment.vote_type.as_i16())
        .bind(comment.origin.as_i16())
        .bind(&likes)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(RepositoryError::CommentNotFound(comment.id));
        }
        Ok(())
    }

    async fn delete_comments(&self, ids: &[CommentId]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let deleted = sqlx::query("DELETE FROM comments WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted)
    }
}

#[async_trait]
impl UsersRepository for PostgresStore {
    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, display_name, avatar_url FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn get_users(&self, ids: &[UserId]) -> Result<Vec<UserProfile>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, display_name, avatar_url FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO users (id, display_name, avatar_url) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET display_name = $2, avatar_url = $3",
        )
        .bind(profile.id)
        .bind(&profile.display_name)
        .bind(&profile.avatar_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionsRepository for PostgresStore {
    async fn resolve_session(&self, token: &str) -> Result<Option<UserId>, RepositoryError> {
        let user_id = sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM sessions WHERE token = $1 AND (expires_at IS NULL OR expires_at > NOW())",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user_id)
    }

    async fn insert_session(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3) \
             ON CONFLICT (token) DO UPDATE SET user_id = $2, expires_at = $3",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
