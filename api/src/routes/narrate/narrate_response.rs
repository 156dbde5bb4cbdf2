use serde::Serialize;

/// Response payload for /api/extension/narrate.
#[derive(Debug, Serialize)]
pub struct NarrateResponse {
    /// Raw model completion (HTML-flavoured bullet list).
    pub summary: String,
}
