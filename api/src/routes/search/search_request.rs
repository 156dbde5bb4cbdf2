use serde::Deserialize;

use crate::core::http::lenient;

/// Request payload for /api/extension/search.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Any truthy JSON value; see [`lenient::truthy_text`].
    #[serde(default, deserialize_with = "lenient::truthy_text")]
    pub query: Option<String>,
    /// Code visible in the editor, used as the only source for the answer.
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub context: Option<String>,
}
