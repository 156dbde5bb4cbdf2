//! POST /api/extension/impact — risk label plus local complexity score.

use std::sync::Arc;

use axum::{Json, extract::State};
use code_insight::{ImpactAssessment, ImpactVerdict, Structured, complexity_score, prompt};
use tracing::{debug, error, instrument, warn};

use crate::{
    core::{app_state::AppState, http::json_body::JsonBody},
    error_handler::{AppError, AppResult},
    routes::impact::impact_request::ImpactRequest,
};

/// Handler: POST /api/extension/impact
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/extension/impact \
///   -H 'content-type: application/json' \
///   -H 'x-gitlore-extension-key: <secret>' \
///   -d '{"codeSnippet":"db.users.insert(req.body)"}'
/// ```
#[instrument(name = "impact_route", skip_all)]
pub async fn impact_route(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<ImpactRequest>,
) -> AppResult<Json<ImpactAssessment>> {
    let snippet = body
        .code_snippet
        .ok_or_else(|| AppError::BadRequest("Missing codeSnippet".into()))?;

    let completion = state
        .chat
        .chat(prompt::impact_prompt(&snippet).into_request())
        .await
        .map_err(|e| {
            error!(error = %e, "impact: model call failed");
            AppError::from(e)
        })?;

    let verdict = ImpactVerdict::from_completion(&completion.content);
    if let Some(reason) = verdict.fallback_reason() {
        warn!(%reason, "impact: unstructured completion, using raw text");
    }

    let score = complexity_score(&snippet);
    debug!(score, chars = snippet.chars().count(), "impact: complexity scored");

    Ok(Json(ImpactAssessment::new(verdict.into_value(), score)))
}
