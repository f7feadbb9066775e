use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use campus_votes_engine::EngineError;
use serde::Serialize;
use tracing::error;

/// Error returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_seconds: Option<u64>,
}

impl ErrorBody {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            remaining_seconds: None,
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(e) => match e {
                EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                EngineError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                EngineError::NotFound(_) => StatusCode::NOT_FOUND,
                EngineError::Validation(_) => StatusCode::BAD_REQUEST,
                EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
                EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::BadRequest(message) => {
                (status, Json(ErrorBody::message(message))).into_response()
            }
            ApiError::Engine(EngineError::RateLimited {
                action,
                remaining_secs,
            }) => {
                let body = ErrorBody {
                    error: format!("Too many {action} actions, try again later"),
                    remaining_seconds: Some(remaining_secs),
                };
                let mut response = (status, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(remaining_secs));
                response
            }
            ApiError::Engine(EngineError::Storage(e)) => {
                error!(error = %e, "Storage failure while handling request");
                (status, Json(ErrorBody::message("Internal server error"))).into_response()
            }
            ApiError::Engine(EngineError::Unauthorized(message))
            | ApiError::Engine(EngineError::NotFound(message))
            | ApiError::Engine(EngineError::Validation(message))
            | ApiError::Engine(EngineError::Forbidden(message)) => {
                (status, Json(ErrorBody::message(message))).into_response()
            }
        }
    }
}
