//! POST /api/extension/risk — security score of one function.
//!
//! Always answers `200`; failures are encoded as a score of `0` (or `5` when
//! the model's answer could not be read) so the editor can render them inline.

use std::sync::Arc;

use axum::{Json, extract::State};
use code_insight::{
    RiskAssessment, Structured,
    assessment::{RISK_INVALID_BODY_REASON, RISK_NO_CODE_REASON},
    prompt::{self, RISK_CODE_BUDGET},
};
use tracing::{debug, error, instrument, warn};

use crate::{
    core::{
        app_state::AppState,
        http::json_body::{JsonBody, JsonBodyError},
    },
    routes::risk::risk_request::RiskRequest,
};

#[instrument(name = "risk_route", skip_all)]
pub async fn risk_route(
    State(state): State<Arc<AppState>>,
    body: Result<JsonBody<RiskRequest>, JsonBodyError>,
) -> Json<RiskAssessment> {
    let body = match body {
        Ok(JsonBody(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection, "risk: unreadable request body");
            return Json(RiskAssessment::soft_fail(RISK_INVALID_BODY_REASON));
        }
    };
    let Some(code) = body.function_code else {
        return Json(RiskAssessment::soft_fail(RISK_NO_CODE_REASON));
    };

    let built = prompt::risk_prompt(&code);
    if built.truncated {
        warn!(
            chars = code.chars().count(),
            budget = RISK_CODE_BUDGET,
            "risk: function code truncated"
        );
    }

    let completion = match state.chat.chat(built.into_request()).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "risk: model call failed");
            return Json(RiskAssessment::ai_service_error(&e));
        }
    };
    debug!(raw = %completion.content, "risk: raw completion");

    let assessment = RiskAssessment::from_completion(&completion.content);
    if let Some(reason) = assessment.fallback_reason() {
        warn!(%reason, "risk: unstructured completion, using fallback");
    }
    Json(assessment.into_value())
}
