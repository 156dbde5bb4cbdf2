//! Crate-wide error type for git-raw-files.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type GitRawFilesResult<T> = Result<T, GitRawFilesError>;

/// Failure while fetching raw file content.
#[derive(Debug, Error)]
pub enum GitRawFilesError {
    /// Owner, repository or path failed validation; no request was made.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Client could not be built (TLS backend, bad base URL).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited {
        /// `Retry-After` hint in seconds when the server sent one.
        retry_after_secs: Option<u64>,
    },

    /// Any other non-2xx status.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),
}

impl GitRawFilesError {
    /// Maps a non-success status into the matching variant.
    pub fn from_status(code: u16, retry_after_secs: Option<u64>) -> Self {
        match code {
            401 => GitRawFilesError::Unauthorized,
            403 => GitRawFilesError::Forbidden,
            404 => GitRawFilesError::NotFound,
            429 => GitRawFilesError::RateLimited { retry_after_secs },
            _ => GitRawFilesError::HttpStatus(code),
        }
    }
}

impl From<reqwest::Error> for GitRawFilesError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return GitRawFilesError::Timeout;
        }
        if let Some(status) = e.status() {
            return GitRawFilesError::from_status(status.as_u16(), None);
        }
        GitRawFilesError::Network(e.to_string())
    }
}
