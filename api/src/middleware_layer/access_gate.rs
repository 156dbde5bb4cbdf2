//! Shared-secret gate for the editor-extension routes.
//!
//! The extension sends its key in `x-gitlore-extension-key`. The gate runs
//! once per request as a route layer, so a rejected request never reaches the
//! handler or the model. Each route keeps its own rejection shape.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use code_insight::RiskAssessment;
use serde_json::json;
use tracing::warn;

use crate::error_handler::AppError;

pub const EXTENSION_KEY_HEADER: &str = "x-gitlore-extension-key";

/// How a rejected request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionStyle {
    /// `401 {"error":"Unauthorized"}`.
    Hard,
    /// `200 {"score":0,"reason":"Unauthorized access."}`.
    SoftRisk,
    /// `401 {"answer":"Auth Failed"}`.
    Search,
}

impl RejectionStyle {
    fn reject(self) -> Response {
        match self {
            RejectionStyle::Hard => AppError::Unauthorized.into_response(),
            RejectionStyle::SoftRisk => Json(RiskAssessment::unauthorized()).into_response(),
            RejectionStyle::Search => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "answer": "Auth Failed" }))).into_response()
            }
        }
    }
}

/// Gate configuration carried as middleware state.
#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: Arc<str>,
    style: RejectionStyle,
}

impl AccessGate {
    pub fn new(secret: Arc<str>, style: RejectionStyle) -> Self {
        Self { secret, style }
    }

    /// True when the header is present, valid UTF-8, non-empty and equal to the secret.
    pub fn allows(&self, headers: &HeaderMap) -> bool {
        headers
            .get(EXTENSION_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|key| !key.is_empty() && key.as_bytes() == self.secret.as_bytes())
    }
}

/// Middleware body; install with `middleware::from_fn_with_state(gate, access_gate)`.
pub async fn access_gate(State(gate): State<AccessGate>, req: Request, next: Next) -> Response {
    if gate.allows(req.headers()) {
        return next.run(req).await;
    }

    warn!(
        path = %req.uri().path(),
        "Unauthorized extension request - missing or invalid key"
    );
    gate.style.reject()
}
