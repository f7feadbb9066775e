use serde::{Deserialize, Serialize};
use crate::types::UserId;

/// The slice of a user's profile this service needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Author display fields joined onto comments returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl From<&UserProfile> for AuthorSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            display_name: profile.display_name.clone(),
            avatar_url: profile.avatar_url.clone(),
        }
    }
}

impl AuthorSummary {
    /// Placeholder for authors whose profile is no longer available.
    pub fn unknown(id: UserId) -> Self {
        Self {
            id,
            display_name: "Unknown user".to_string(),
            avatar_url: None,
        }
    }
}
