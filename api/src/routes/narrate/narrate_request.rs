use serde::Deserialize;

use crate::core::http::lenient;

/// Request payload for /api/extension/narrate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrateRequest {
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub file_content: Option<String>,
    /// Workspace-relative path, shown to the model as context only.
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub file_path: Option<String>,
}
