use serde::Serialize;

/// Response payload for /api/file-summary.
#[derive(Debug, Serialize)]
pub struct FileSummaryResponse {
    pub path: String,
    /// File content, capped for display.
    pub code: String,
    /// Markdown description.
    pub summary: String,
    /// Mermaid diagram source, or empty.
    pub mermaid: String,
}
