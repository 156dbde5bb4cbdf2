//! POST /api/extension/search — short answer grounded in editor context.

use std::sync::Arc;

use axum::extract::State;
use code_insight::prompt;
use tracing::{error, instrument, warn};

use crate::{
    core::{
        app_state::AppState,
        http::json_body::{JsonBody, JsonBodyError},
    },
    routes::search::{search_request::SearchRequest, search_response::SearchReply},
};

#[instrument(name = "search_route", skip_all)]
pub async fn search_route(
    State(state): State<Arc<AppState>>,
    body: Result<JsonBody<SearchRequest>, JsonBodyError>,
) -> SearchReply {
    let body = match body {
        Ok(JsonBody(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection, "search: unreadable request body");
            return SearchReply::Overloaded;
        }
    };
    let Some(query) = body.query else {
        return SearchReply::EmptyQuery;
    };

    let built = prompt::search_prompt(&query, body.context.as_deref());
    if built.truncated {
        warn!("search: context truncated");
    }

    match state.chat.chat(built.into_request()).await {
        Ok(completion) => SearchReply::Answer(completion.content.trim().to_string()),
        Err(e) => {
            error!(error = %e, "search: model call failed");
            SearchReply::Overloaded
        }
    }
}
