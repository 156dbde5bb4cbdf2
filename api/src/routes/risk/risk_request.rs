use serde::Deserialize;

use crate::core::http::lenient;

/// Request payload for /api/extension/risk.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRequest {
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub function_code: Option<String>,
}
