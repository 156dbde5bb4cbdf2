use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const EMPTY_QUERY_ANSWER: &str = "Ask something.";
pub const OVERLOADED_ANSWER: &str = "System Overload. Try again.";

/// Response payload for /api/extension/search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub answer: String,
}

/// Every outcome of a search request; all are rendered as `{ "answer": … }`.
#[derive(Debug)]
pub enum SearchReply {
    Answer(String),
    EmptyQuery,
    /// Unparseable body or model failure.
    Overloaded,
}

impl IntoResponse for SearchReply {
    fn into_response(self) -> Response {
        let (status, answer) = match self {
            SearchReply::Answer(a) => (StatusCode::OK, a),
            SearchReply::EmptyQuery => (StatusCode::OK, EMPTY_QUERY_ANSWER.to_string()),
            SearchReply::Overloaded => (
                StatusCode::INTERNAL_SERVER_ERROR,
                OVERLOADED_ANSWER.to_string(),
            ),
        };
        (status, Json(SearchResponse { answer })).into_response()
    }
}
