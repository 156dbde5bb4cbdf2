//! POST /api/extension/narrate — short narration of a whole file.

use std::sync::Arc;

use axum::{Json, extract::State};
use code_insight::prompt;
use tracing::{error, info, instrument};

use crate::{
    core::{app_state::AppState, http::json_body::JsonBody},
    error_handler::{AppError, AppResult},
    routes::narrate::{narrate_request::NarrateRequest, narrate_response::NarrateResponse},
};

#[instrument(name = "narrate_route", skip_all)]
pub async fn narrate_route(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<NarrateRequest>,
) -> AppResult<Json<NarrateResponse>> {
    let content = body
        .file_content
        .ok_or_else(|| AppError::BadRequest("Missing fileContent".into()))?;

    info!(
        path = body.file_path.as_deref().unwrap_or("unknown"),
        chars = content.chars().count(),
        "narrate: request received"
    );

    let completion = state
        .chat
        .chat(prompt::narrate_prompt(&content, body.file_path.as_deref()).into_request())
        .await
        .map_err(|e| {
            error!(error = %e, "narrate: model call failed");
            AppError::from(e)
        })?;

    Ok(Json(NarrateResponse {
        summary: completion.content,
    }))
}
