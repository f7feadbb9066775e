// Identity extraction: turns a bearer token into the acting user
use std::sync::Arc;

use axum::http::{HeaderMap, header};
use campus_votes_engine::EngineError;
use campus_votes_repository::SessionsRepository;
use campus_votes_shared::types::UserId;
use tracing::debug;

/// Resolves tokens against the session store.
///
/// The vote endpoint passes the token from its body and the comment endpoints
/// pass the `Authorization` header; both end up here.
pub struct Authenticator {
    sessions: Arc<dyn SessionsRepository>,
}

impl Authenticator {
    pub fn new(sessions: Arc<dyn SessionsRepository>) -> Self {
        Self { sessions }
    }

    pub async fn authenticate(&self, token: Option<&str>) -> Result<UserId, EngineError> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| EngineError::unauthorized("missing token"))?;

        match self.sessions.resolve_session(token).await? {
            Some(user_id) => Ok(user_id),
            None => {
                debug!("Rejected unknown or expired token");
                Err(EngineError::unauthorized("invalid or expired token"))
            }
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token.trim())
}
