use std::path::Path;

use campus_votes_repository::{EntitiesRepository, SessionsRepository, UsersRepository};
use campus_votes_shared::types::{EntityId, EntityKind, UserId, UserProfile, VoteableEntity};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::errors::ServerError;

/// Users, sessions and entities loaded at startup, mainly for local runs
/// against the in-memory store.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub sessions: Vec<SeedSession>,
    #[serde(default)]
    pub entities: Vec<SeedEntity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSession {
    pub token: String,
    pub user_id: UserId,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
}

impl SeedData {
    /// Reads and parses a JSON seed file.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| ServerError::Seed(format!("{}: {e}", path.display())))
    }

    /// Writes the seed into `store`.
    ///
    /// Users and sessions are upserted. Entities that already exist are left
    /// untouched so their tallies survive restarts.
    pub async fn apply<S>(&self, store: &S) -> Result<(), ServerError>
    where
        S: UsersRepository + SessionsRepository + EntitiesRepository,
    {
        for user in &self.users {
            store.upsert_user(user).await?;
        }
        for session in &self.sessions {
            store
                .insert_session(&session.token, session.user_id, session.expires_at)
                .await?;
        }
        let mut created = 0;
        for entity in &self.entities {
            if store.get_entity(entity.id).await?.is_none() {
                store
                    .create_entity(&VoteableEntity::new(entity.id, entity.kind, entity.name.clone()))
                    .await?;
                created += 1;
            }
        }

        info!(
            users = self.users.len(),
            sessions = self.sessions.len(),
            entities_created = created,
            "Seed data applied"
        );
        Ok(())
    }
}
