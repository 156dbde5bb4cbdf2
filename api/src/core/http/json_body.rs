//! JSON request bodies decoded regardless of `Content-Type`.
//!
//! Extension webviews often post `JSON.stringify(..)` without setting a JSON
//! content type (`text/plain;charset=UTF-8`), which axum's `Json` refuses.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request, rejection::BytesRejection},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::error_handler::AppError;

/// Body that could not be read or is not valid JSON for the target type.
#[derive(Debug, Error)]
pub enum JsonBodyError {
    #[error("Failed to read request body: {0}")]
    Read(#[from] BytesRejection),

    #[error("Invalid JSON body: {0}")]
    Syntax(#[from] serde_json::Error),
}

/// Rendered as `500 {"error": ...}` for handlers that do not catch it.
impl IntoResponse for JsonBodyError {
    fn into_response(self) -> Response {
        warn!(error = %self, "unreadable request body");
        AppError::from(self).into_response()
    }
}

/// Extractor: raw body bytes parsed with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        Ok(JsonBody(serde_json::from_slice(&bytes)?))
    }
}
