use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts, HeaderMap},
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// `:id` path segment parsed as a base-10 `i64`. Anything else is a 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i64);

pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        warn!(id = %raw, "non-numeric id");
        ApiError::bad_request("Invalid id")
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        parse_id(&raw).map(PathId)
    }
}

/// A request body that may be absent.
///
/// `REJECTION` is the 400 message sent when a JSON body is present but does
/// not fit the type.
pub trait JsonPayload: DeserializeOwned + Default {
    const REJECTION: &'static str;
}

/// JSON request body whose failures are [`ApiError`]s.
///
/// A missing body, or one not sent as JSON, is read as `T::default()`, so
/// presence checks downstream decide what is required.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

pub fn parse_body<T: JsonPayload>(headers: &HeaderMap, bytes: &[u8]) -> Result<T, ApiError> {
    if !is_json(headers) || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| {
        warn!(error = %e, "rejected request body");
        ApiError::bad_request(T::REJECTION)
    })
}

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: JsonPayload,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        parse_body(&headers, &bytes).map(JsonBody)
    }
}
