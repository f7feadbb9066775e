// HTTP request handlers
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use campus_votes_shared::types::{CommentId, CommentView, EntityId, VoteableEntity};

use crate::errors::ApiError;
use crate::server::auth::bearer_token;
use crate::server::models::{
    CommentRequest, CommentsResponse, EditCommentRequest, VoteCredential, VoteRequest,
    VoteResponse,
};
use crate::server::state::AppState;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Campus votes service is running")
}

/// Casts a vote; the credential travels in the request body.
///
/// The credential is read leniently and checked before the rest of the body,
/// so an anonymous request is rejected as unauthorized even when malformed.
pub async fn cast_vote(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<VoteResponse>, ApiError> {
    let credential = serde_json::from_slice::<VoteCredential>(&body)
        .ok()
        .and_then(|credential| credential.token);
    let actor_id = state.auth.authenticate(credential.as_deref()).await?;

    let request: VoteRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid vote request: {e}")))?;

    let outcome = state
        .service
        .cast_vote(actor_id, request.entity_id, &request.polarity)
        .await?;
    Ok(Json(outcome.into()))
}

/// Posts the caller's own comment on an entity they voted on.
pub async fn post_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<CommentView>, ApiError> {
    let actor_id = state.auth.authenticate(bearer_token(&headers)).await?;
    let Json(request) = payload?;

    let comment = state
        .service
        .post_comment(actor_id, request.entity_id, &request.content)
        .await?;
    Ok(Json(comment))
}

/// Edits one of the caller's user-authored comments.
pub async fn edit_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    comment_id: Result<Path<CommentId>, PathRejection>,
    payload: Result<Json<EditCommentRequest>, JsonRejection>,
) -> Result<Json<CommentView>, ApiError> {
    let actor_id = state.auth.authenticate(bearer_token(&headers)).await?;
    let Path(comment_id) = comment_id?;
    let Json(request) = payload?;

    let comment = state
        .service
        .edit_comment(actor_id, comment_id, &request.content)
        .await?;
    Ok(Json(comment))
}

pub async fn get_entity(
    State(state): State<AppState>,
    entity_id: Result<Path<EntityId>, PathRejection>,
) -> Result<Json<VoteableEntity>, ApiError> {
    let Path(entity_id) = entity_id?;
    Ok(Json(state.service.entity_summary(entity_id).await?))
}

pub async fn list_comments(
    State(state): State<AppState>,
    entity_id: Result<Path<EntityId>, PathRejection>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let Path(entity_id) = entity_id?;
    let items = state.service.list_comments(entity_id).await?;
    Ok(Json(CommentsResponse { items }))
}
