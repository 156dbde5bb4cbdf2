//! Provider facade for chat completions.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once at startup, wrap in `Arc`, and share with handlers.
//! - Holds exactly one concrete provider client; the HTTP client inside it is
//!   built once and reused for every call.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{ChatConfig, ChatMessage, ChatModel, ChatRequest, LlmChatService};
//! use ai_llm_service::config::default_config::config_from_env;
//!
//! # async fn run() -> Result<(), ai_llm_service::AiLlmError> {
//! let svc: Arc<dyn ChatModel> = Arc::new(LlmChatService::from_config(config_from_env()?)?);
//! let completion = svc
//!     .chat(ChatRequest::new(
//!         vec![ChatMessage::user("hello", "Say hi")],
//!         ChatConfig::with_max_tokens(32),
//!     ))
//!     .await?;
//! println!("{}", completion.content);
//! # Ok(()) }
//! ```

use async_trait::async_trait;

use crate::{
    chat::{ChatModel, ChatRequest, Completion},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{gemini_service::GeminiService, ollama_service::OllamaService},
};

/// Concrete chat client with enum dispatch over the supported providers.
#[derive(Debug)]
pub enum LlmChatService {
    Gemini(GeminiService),
    Ollama(OllamaService),
}

impl LlmChatService {
    /// Builds the provider client selected by `cfg.provider`.
    ///
    /// # Errors
    /// Propagates the provider constructor's validation errors.
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Gemini => LlmChatService::Gemini(GeminiService::new(cfg)?),
            LlmProvider::Ollama => LlmChatService::Ollama(OllamaService::new(cfg)?),
        })
    }

    pub fn provider(&self) -> LlmProvider {
        match self {
            LlmChatService::Gemini(_) => LlmProvider::Gemini,
            LlmChatService::Ollama(_) => LlmProvider::Ollama,
        }
    }
}

#[async_trait]
impl ChatModel for LlmChatService {
    async fn chat(&self, request: ChatRequest) -> Result<Completion, AiLlmError> {
        match self {
            LlmChatService::Gemini(svc) => svc.chat(&request).await,
            LlmChatService::Ollama(svc) => svc.chat(&request).await,
        }
    }
}
