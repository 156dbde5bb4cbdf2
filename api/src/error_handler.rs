use ai_llm_service::AiLlmError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use git_raw_files::GitRawFilesError;
use serde::Serialize;
use thiserror::Error;

use crate::core::http::json_body::JsonBodyError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    // --- Lower layers ---
    #[error(transparent)]
    InvalidBody(#[from] JsonBodyError),

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    FileSource(#[from] GitRawFilesError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,

            // startup-only
            AppError::MissingEnv(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 5xx
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidBody(_) | AppError::Llm(_) | AppError::FileSource(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_variant() {
        assert_eq!(
            AppError::BadRequest("Missing codeSnippet".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Llm(AiLlmError::StreamingUnsupported).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_are_rendered_verbatim() {
        assert_eq!(AppError::Unauthorized.to_string(), "Unauthorized");
        assert_eq!(
            AppError::BadRequest("Missing fileContent".into()).to_string(),
            "Missing fileContent"
        );
        assert_eq!(
            AppError::MissingEnv("EXTENSION_SECRET").to_string(),
            "missing required environment variable: EXTENSION_SECRET"
        );
    }
}
