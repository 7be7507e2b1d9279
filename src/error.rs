//! HTTP error type shared by all handlers.
//!
//! Validation and not-found errors answer with a short JSON `{"msg": ...}`.
//! Everything else is logged and answered with an opaque plain-text 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// `{"msg": "..."}` body used by client-facing errors and confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

impl Message {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Restricted { user_id, articles } => {
                warn!(user_id, articles, "user deletion restricted");
                ApiError::Conflict("User still has articles".into())
            }
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(err) => {
                // Details stay in the log; clients only see a fixed string.
                error!(error = %format!("{err:#}"), "request failed");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response();
            }
        };
        (status, Json(Message::new(msg))).into_response()
    }
}
