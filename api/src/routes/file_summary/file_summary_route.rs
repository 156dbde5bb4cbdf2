//! POST /api/file-summary — Repo Narrator description of one GitHub file.

use std::sync::Arc;

use axum::{Json, extract::State};
use code_insight::{FileSummary, Structured, prompt};
use tracing::{error, info, instrument, warn};

use crate::{
    core::{app_state::AppState, http::json_body::JsonBody},
    error_handler::{AppError, AppResult},
    routes::file_summary::{
        file_summary_request::FileSummaryRequest, file_summary_response::FileSummaryResponse,
    },
};

/// Handler: POST /api/file-summary
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/file-summary \
///   -H 'content-type: application/json' \
///   -d '{"owner":"octo","name":"gitlore","path":"src/lib/github.ts"}'
/// ```
#[instrument(name = "file_summary_route", skip_all)]
pub async fn file_summary_route(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<FileSummaryRequest>,
) -> AppResult<Json<FileSummaryResponse>> {
    let (Some(owner), Some(name), Some(path)) = (body.owner, body.name, body.path) else {
        return Err(AppError::BadRequest("Missing owner, name, or path".into()));
    };

    let content = state
        .files
        .fetch_raw(&owner, &name, &path)
        .await
        .map_err(|e| {
            warn!(%owner, repo = %name, %path, error = %e, "file-summary: fetch failed");
            AppError::BadRequest("Failed to fetch file content from GitHub.".into())
        })?;
    info!(%path, chars = content.chars().count(), "file-summary: file fetched");

    let built = prompt::file_summary_prompt(&path, &content);
    if built.truncated {
        warn!(%path, "file-summary: content truncated for prompt");
    }

    let completion = state
        .chat
        .chat(built.into_request())
        .await
        .map_err(|e| {
            error!(error = %e, "file-summary: model call failed");
            AppError::from(e)
        })?;

    let parsed = FileSummary::from_completion(&completion.content);
    if let Some(reason) = parsed.fallback_reason() {
        warn!(%reason, "file-summary: unstructured completion, using fallback");
    }
    let FileSummary { summary, mermaid } = parsed.into_value();

    Ok(Json(FileSummaryResponse {
        code: prompt::echo_code(&content),
        path,
        summary,
        mermaid,
    }))
}
