use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::{EntityId, Polarity, TallyDelta, UserId};

/// Represents a user's vote on a voteable entity.
///
/// There is at most one record per (user, entity) pair; re-voting replaces
/// the polarity and the record is never removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserVote {
    pub user_id: UserId,
    pub entity_id: EntityId,
    pub polarity: Polarity,
    pub voted_at: DateTime<Utc>,
}

/// A vote switch to be persisted together with its tally delta.
///
/// `previous` is the polarity that was read before computing the change. Stores
/// apply the change only if the stored polarity still equals it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteChange {
    pub user_id: UserId,
    pub entity_id: EntityId,
    pub previous: Option<Polarity>,
    pub current: Polarity,
    pub voted_at: DateTime<Utc>,
}

impl VoteChange {
    pub fn delta(&self) -> TallyDelta {
        TallyDelta::for_switch(self.previous, self.current)
    }

    /// The vote record as it looks once the change is applied.
    pub fn as_user_vote(&self) -> UserVote {
        UserVote {
            user_id: self.user_id,
            entity_id: self.entity_id,
            polarity: self.current,
            voted_at: self.voted_at,
        }
    }
}
