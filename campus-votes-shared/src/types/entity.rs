use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::{EntityId, Tally};

/// The kind of record that exposes a vote tally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Campus,
    Community,
}

impl EntityKind {
    /// Storage code used by the SQL backend.
    pub fn as_i16(self) -> i16 {
        match self {
            EntityKind::Campus => 0,
            EntityKind::Community => 1,
        }
    }

    pub fn from_i16(code: i16) -> Option<Self> {
        match code {
            0 => Some(EntityKind::Campus),
            1 => Some(EntityKind::Community),
            _ => None,
        }
    }
}

/// A campus or community that users can vote on.
///
/// The tally starts at zero when the entity is created and is only ever
/// changed by vote casts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteableEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub tally: Tally,
    pub created_at: DateTime<Utc>,
}

impl VoteableEntity {
    /// Creates an entity with an all-zero tally.
    pub fn new(id: EntityId, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            tally: Tally::default(),
            created_at: Utc::now(),
        }
    }
}
