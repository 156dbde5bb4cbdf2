use serde::Deserialize;

use crate::core::http::lenient;

/// Request payload for /api/file-summary.
#[derive(Debug, Deserialize)]
pub struct FileSummaryRequest {
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub owner: Option<String>,
    /// Repository name.
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub path: Option<String>,
}
