// Request and response bodies of the HTTP API
use campus_votes_engine::VoteOutcome;
use campus_votes_shared::types::{CommentView, EntityId, Polarity, Tally};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub entity_id: EntityId,
    /// Parsed by the engine so that unknown values map to a validation error.
    pub polarity: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// Only the credential of a vote request, read before the full body is validated.
#[derive(Debug, Deserialize)]
pub struct VoteCredential {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub tally: Tally,
    pub actor_polarity: Polarity,
    pub comment: CommentView,
}

impl From<VoteOutcome> for VoteResponse {
    fn from(outcome: VoteOutcome) -> Self {
        Self {
            tally: outcome.tally,
            actor_polarity: outcome.actor_polarity,
            comment: outcome.comment,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub entity_id: EntityId,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct EditCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub items: Vec<CommentView>,
}
