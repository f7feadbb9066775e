//! Integration tests for the PostgreSQL store.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test --test postgres_integration -- --ignored`

use campus_votes_repository::{
    CommentsRepository, EntitiesRepository, PostgresStore, RepositoryError, SessionsRepository,
    UsersRepository, VotesRepository,
};
use campus_votes_shared::types::{
    Comment, EntityKind, Polarity, Tally, UserProfile, VoteChange, VoteableEntity,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

fn make_entity() -> VoteableEntity {
    VoteableEntity::new(Uuid::new_v4(), EntityKind::Community, "Chess Club")
}

fn make_change(
    user_id: Uuid,
    entity_id: Uuid,
    previous: Option<Polarity>,
    current: Polarity,
) -> VoteChange {
    VoteChange {
        user_id,
        entity_id,
        previous,
        current,
        voted_at: Utc::now(),
    }
}

// ============================================================================
// Votes Tests
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_first_vote_and_switch(pool: sqlx::PgPool) {
    let store = PostgresStore::new(pool);
    let entity = make_entity();
    store.create_entity(&entity).await.unwrap();
    let user_id = Uuid::new_v4();

    let tally = store
        .apply_vote_change(&make_change(user_id, entity.id, None, Polarity::Positive))
        .await
        .unwrap();
    assert_eq!(tally, Tally { positive: 1, neutral: 0, negative: 0 });

    let tally = store
        .apply_vote_change(&make_change(
            user_id,
            entity.id,
            Some(Polarity::Positive),
            Polarity::Negative,
        ))
        .await
        .unwrap();
    assert_eq!(tally, Tally { positive: 0, neutral: 0, negative: 1 });

    let vote = store.get_user_vote(user_id, entity.id).await.unwrap().unwrap();
    assert_eq!(vote.polarity, Polarity::Negative);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_stale_vote_leaves_tally_untouched(pool: sqlx::PgPool) {
    let store = PostgresStore::new(pool);
    let entity = make_entity();
    store.create_entity(&entity).await.unwrap();
    let user_id = Uuid::new_v4();
    store
        .apply_vote_change(&make_change(user_id, entity.id, None, Polarity::Neutral))
        .await
        .unwrap();

    let result = store
        .apply_vote_change(&make_change(user_id, entity.id, None, Polarity::Neutral))
        .await;

    assert!(matches!(result, Err(RepositoryError::StaleVote { .. })));
    let stored = store.get_entity(entity.id).await.unwrap().unwrap();
    assert_eq!(stored.tally.total(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_vote_on_missing_entity(pool: sqlx::PgPool) {
    let store = PostgresStore::new(pool);
    let result = store
        .apply_vote_change(&make_change(Uuid::new_v4(), Uuid::new_v4(), None, Polarity::Positive))
        .await;
    assert!(matches!(result, Err(RepositoryError::EntityNotFound(_))));
}

// ============================================================================
// Comments Tests
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_second_comment_for_pair_is_rejected(pool: sqlx::PgPool) {
    let store = PostgresStore::new(pool);
    let entity_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    store
        .insert_comment(&Comment::from_template(entity_id, author_id, Polarity::Positive))
        .await
        .unwrap();

    let result = store
        .insert_comment(&Comment::authored(entity_id, author_id, Polarity::Positive, "again"))
        .await;

    assert!(matches!(result, Err(RepositoryError::DuplicateComment { .. })));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_update_and_delete_comment(pool: sqlx::PgPool) {
    let store = PostgresStore::new(pool);
    let mut comment = Comment::from_template(Uuid::new_v4(), Uuid::new_v4(), Polarity::Neutral);
    store.insert_comment(&comment).await.unwrap();

    comment.content = "great place".to_string();
    comment.vote_type = Polarity::Positive;
    comment.origin = campus_votes_shared::types::CommentOrigin::User;
    store.update_comment(&comment).await.unwrap();

    let stored = store.get_comment(comment.id).await.unwrap().unwrap();
    assert_eq!(stored.content, "great place");
    assert_eq!(stored.vote_type, Polarity::Positive);
    assert!(!stored.is_auto_tracking());

    assert_eq!(store.delete_comments(&[comment.id]).await.unwrap(), 1);
    assert!(store.get_comment(comment.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_legacy_comment_origin_is_inferred(pool: sqlx::PgPool) {
    let store = PostgresStore::new(pool.clone());
    let entity_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO comments (id, entity_id, author_id, content, vote_type, origin, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, 0, NULL, $5, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(entity_id)
    .bind(author_id)
    .bind(Polarity::Positive.system_template())
    .bind(now)
    .execute(&pool)
    .await
    .unwrap();

    let found = store.find_comments(entity_id, author_id).await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].is_auto_tracking());
}

// ============================================================================
// Users and Sessions Tests
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_sessions_resolve_until_expiry(pool: sqlx::PgPool) {
    let store = PostgresStore::new(pool);
    let profile = UserProfile {
        id: Uuid::new_v4(),
        display_name: "Ada".to_string(),
        avatar_url: None,
    };
    store.upsert_user(&profile).await.unwrap();
    store.insert_session("live", profile.id, None).await.unwrap();
    store
        .insert_session("expired", profile.id, Some(Utc::now() - Duration::minutes(5)))
        .await
        .unwrap();

    assert_eq!(store.resolve_session("live").await.unwrap(), Some(profile.id));
    assert_eq!(store.resolve_session("expired").await.unwrap(), None);
    assert_eq!(store.get_users(&[profile.id]).await.unwrap(), vec![profile]);
}
