use crate::config::llm_provider::LlmProvider;

/// Connection and default generation settings for one provider.
///
/// Per-call settings (`model` override, `max_tokens`) travel in
/// [`ChatConfig`](crate::ChatConfig); the values here are the fallbacks.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Gemini,
///     model: "gemini-2.5-flash".to_string(),
///     endpoint: "https://generativelanguage.googleapis.com".to_string(),
///     api_key: Some("key".to_string()),
///     max_tokens: None,
///     temperature: None,
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.timeout_secs(), 60);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The backend serving completions.
    pub provider: LlmProvider,

    /// Default model identifier (e.g. `"gemini-2.5-flash"`, `"qwen3:14b"`).
    pub model: String,

    /// Base URL of the provider API.
    pub endpoint: String,

    /// API key for providers that require one (Gemini).
    pub api_key: Option<String>,

    /// Token cap applied when a call does not set its own.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Effective timeout, falling back to [`Self::DEFAULT_TIMEOUT_SECS`].
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(Self::DEFAULT_TIMEOUT_SECS)
    }
}
