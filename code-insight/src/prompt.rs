//! Prompt builder: one fixed instruction template per endpoint.
//!
//! Every builder embeds its input verbatim (after optional truncation) and
//! yields exactly one `user` message. Truncation budgets are counted in
//! characters and a truncated input is flagged, never rejected.

use ai_llm_service::{ChatConfig, ChatMessage, ChatRequest};

/// Character budget for function code sent to the risk auditor.
pub const RISK_CODE_BUDGET: usize = 5_000;
/// Character budget for file content embedded in the file-summary prompt.
pub const FILE_SUMMARY_CONTENT_BUDGET: usize = 8_000;
/// Character budget for the search context.
pub const SEARCH_CONTEXT_BUDGET: usize = 5_000;
/// Character budget for file content echoed back to the web UI.
pub const ECHO_CODE_BUDGET: usize = 16_000;

const ECHO_TRUNCATION_MARKER: &str = "\n// … truncated";
const NO_CONTEXT: &str = "No context provided.";
const UNKNOWN_PATH: &str = "unknown";

/// Endpoint a prompt belongs to; fixes the message id and generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Risk,
    Impact,
    Narrate,
    Search,
    FileSummary,
}

impl PromptKind {
    /// Message id sent along with the prompt.
    pub fn id(self) -> &'static str {
        match self {
            PromptKind::Risk => "risk-prompt",
            PromptKind::Impact => "impact-prompt",
            PromptKind::Narrate => "narrate-prompt",
            PromptKind::Search => "search-prompt",
            PromptKind::FileSummary => "file-summary",
        }
    }

    /// Generation settings used for this endpoint.
    ///
    /// The model is left to the service default; file summaries use the
    /// provider's own token limit.
    pub fn chat_config(self) -> ChatConfig {
        match self {
            PromptKind::Risk => ChatConfig::with_max_tokens(1_000),
            PromptKind::Impact => ChatConfig::with_max_tokens(150),
            PromptKind::Narrate => ChatConfig::with_max_tokens(1_000),
            PromptKind::Search => ChatConfig::with_max_tokens(200),
            PromptKind::FileSummary => ChatConfig::default(),
        }
    }
}

/// A prompt ready to be sent, plus whether any input was cut.
#[derive(Debug, Clone)]
pub struct BuiltPrompt {
    pub kind: PromptKind,
    pub message: ChatMessage,
    pub truncated: bool,
}

impl BuiltPrompt {
    fn new(kind: PromptKind, content: String, truncated: bool) -> Self {
        Self {
            kind,
            message: ChatMessage::user(kind.id(), content),
            truncated,
        }
    }

    /// Wraps the message into a single-message request with the endpoint's config.
    pub fn into_request(self) -> ChatRequest {
        ChatRequest::new(vec![self.message], self.kind.chat_config())
    }
}

/// Borrowed prefix of a string cut at a character budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncated<'a> {
    pub text: &'a str,
    pub was_truncated: bool,
}

/// Keeps at most `max_chars` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, max_chars: usize) -> Truncated<'_> {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => Truncated {
            text: &s[..byte_idx],
            was_truncated: true,
        },
        None => Truncated {
            text: s,
            was_truncated: false,
        },
    }
}

/// Security audit of a single function; asks for `{ score, reason }` JSON.
pub fn risk_prompt(function_code: &str) -> BuiltPrompt {
    let code = truncate_chars(function_code, RISK_CODE_BUDGET);
    let content = format!(
        r#"You are a senior code auditor. Analyze the following function.
Return a JSON object with this exact structure: {{ "score": number, "reason": "string" }}.
Score is 1-10 (10 is high risk). Keep reason under 20 words.
Do NOT use Markdown blocks. Just raw JSON.

Code:
```
{}
```"#,
        code.text
    );
    BuiltPrompt::new(PromptKind::Risk, content, code.was_truncated)
}

/// Risk classification of a snippet; asks for `{ riskLabel, riskColor, summary }` JSON.
pub fn impact_prompt(code_snippet: &str) -> BuiltPrompt {
    let content = format!(
        "Analyze this code snippet. Identify specific risks: PII, Auth, External APIs, or Database Writes. \
         Return a JSON object with: riskLabel (string), riskColor (hex string), summary (string). Keep it concise.\
         \n\n```\n{code_snippet}\n```\n\nReturn only valid JSON, no markdown formatting."
    );
    BuiltPrompt::new(PromptKind::Impact, content, false)
}

/// Short HTML-flavoured narration of a whole file.
pub fn narrate_prompt(file_content: &str, file_path: Option<&str>) -> BuiltPrompt {
    let path = file_path.filter(|p| !p.is_empty()).unwrap_or(UNKNOWN_PATH);
    let content = format!(
        "You are an expert code narrator. Summarize this file. Use the following format strictly: \
         <br>• <b>Purpose:</b> [One sentence]<br>• <b>Key Components:</b> [List main functions/classes]\
         <br>• <b>Architecture:</b> [How it fits the system]. Keep it concise.\
         \n\nFile: {path}\n\n```\n{file_content}\n```"
    );
    BuiltPrompt::new(PromptKind::Narrate, content, false)
}

/// Plain-text question answering restricted to the supplied code context.
pub fn search_prompt(query: &str, context: Option<&str>) -> BuiltPrompt {
    let (context, truncated) = match context.filter(|c| !c.is_empty()) {
        Some(ctx) => {
            let t = truncate_chars(ctx, SEARCH_CONTEXT_BUDGET);
            (t.text, t.was_truncated)
        }
        None => (NO_CONTEXT, false),
    };
    let content = format!(
        "You are the GitLore Hologram AI.\n\
         Answer using ONLY the provided code context.\n\
         Keep it under 2 sentences.\n\
         Do NOT use Markdown. Return plain text only.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question: {query}"
    );
    BuiltPrompt::new(PromptKind::Search, content, truncated)
}

/// Repo Narrator prompt asking for `{ summary, mermaid }` JSON about one file.
pub fn file_summary_prompt(path: &str, file_content: &str) -> BuiltPrompt {
    let body = truncate_chars(file_content, FILE_SUMMARY_CONTENT_BUDGET);
    let path_line = format!("File path: {path}");
    let lines: [&str; 12] = [
        "You are Repo Narrator, a senior engineer explaining one file in a codebase.",
        "Given the file content, produce a short JSON description with:",
        r#"1) "summary": detailed markdown with headings and bullet points. Include sections like "Overview", "Key responsibilities", "Important flows", "External dependencies", and "Potential risks / edge cases" where applicable."#,
        r#"2) "mermaid": optional Mermaid JS sequence or flow diagram capturing the main flow (or empty string if not helpful)."#,
        "",
        "Return ONLY JSON with shape:",
        r#"{ "summary": string, "mermaid": string }"#,
        "",
        &path_line,
        "",
        "File content:",
        body.text,
    ];
    BuiltPrompt::new(PromptKind::FileSummary, lines.join("\n"), body.was_truncated)
}

/// File content as shown next to the summary, capped with a visible marker.
pub fn echo_code(file_content: &str) -> String {
    let t = truncate_chars(file_content, ECHO_CODE_BUDGET);
    if t.was_truncated {
        format!("{}{ECHO_TRUNCATION_MARKER}", t.text)
    } else {
        t.text.to_string()
    }
}
