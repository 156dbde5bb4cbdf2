use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for chat completions.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// let provider: LlmProvider = "gemini".parse().unwrap();
/// assert_eq!(provider, LlmProvider::Gemini);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Google Gemini `generateContent` API.
    Gemini,
    /// Local or self-hosted Ollama runtime.
    Ollama,
}

impl LlmProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::Ollama => "ollama",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "ollama" => Ok(LlmProvider::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
