use std::sync::Arc;

use ai_llm_service::{
    ChatModel, LlmChatService, config::default_config::config_from_env,
};
use git_raw_files::{FileSource, GitHubClient, GitHubConfig};
use tracing::info;

use crate::error_handler::{AppError, AppResult};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:3000";

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared secret expected in `x-gitlore-extension-key`.
    pub extension_secret: Arc<str>,
    /// Chat-completion client (Gemini or Ollama in production).
    pub chat: Arc<dyn ChatModel>,
    /// Raw file content for the file-summary endpoint.
    pub files: Arc<dyn FileSource>,
}

impl AppState {
    pub fn new(
        extension_secret: impl Into<Arc<str>>,
        chat: Arc<dyn ChatModel>,
        files: Arc<dyn FileSource>,
    ) -> Self {
        Self {
            extension_secret: extension_secret.into(),
            chat,
            files,
        }
    }

    /// Load shared state from environment variables.
    pub fn from_env() -> AppResult<Self> {
        let lookup = |k: &str| std::env::var(k).ok();
        let secret = extension_secret_from_lookup(&lookup)?;

        let llm_cfg = config_from_env()?;
        info!(
            provider = llm_cfg.provider.as_str(),
            model = %llm_cfg.model,
            "LLM client configured"
        );
        let chat = LlmChatService::from_config(llm_cfg)?;

        let gh_cfg = GitHubConfig::from_lookup(&lookup);
        info!(
            base_api = %gh_cfg.base_api,
            authenticated = gh_cfg.token.is_some(),
            "GitHub client configured"
        );
        let files = GitHubClient::new(gh_cfg)?;

        Ok(Self::new(secret, Arc::new(chat), Arc::new(files)))
    }
}

/// `EXTENSION_SECRET`, else `GITLORE_EXTENSION_SECRET`; empty counts as unset.
pub fn extension_secret_from_lookup(env: &dyn Fn(&str) -> Option<String>) -> AppResult<String> {
    ["EXTENSION_SECRET", "GITLORE_EXTENSION_SECRET"]
        .into_iter()
        .find_map(|k| env(k).filter(|v| !v.trim().is_empty()))
        .ok_or(AppError::MissingEnv("EXTENSION_SECRET"))
}

/// `API_ADDRESS` or [`DEFAULT_API_ADDRESS`].
pub fn api_address_from_lookup(env: &dyn Fn(&str) -> Option<String>) -> String {
    env("API_ADDRESS")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string())
}
