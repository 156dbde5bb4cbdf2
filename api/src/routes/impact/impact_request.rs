use serde::Deserialize;

use crate::core::http::lenient;

/// Request payload for /api/extension/impact.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRequest {
    /// Selected code; `None` when absent, empty or not a string.
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub code_snippet: Option<String>,
}
