//! Lightweight Ollama service for chat completions.
//!
//! This module implements a thin client for the Ollama chat API:
//! - `POST {endpoint}/api/chat` — synchronous chat completion (`stream=false`)
//!
//! It uses the universal configuration [`LlmModelConfig`] and ensures
//! that the selected provider is [`LlmProvider::Ollama`].

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    chat::{ChatRequest, Completion},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
    },
};

/// Thin client for Ollama.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses an HTTP client with
/// a configurable timeout.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not `Ollama`
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(Provider::Ollama, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs()))
            .gzip(true)
            .brotli(true)
            .build()?;

        let url_chat = format!("{}/api/chat", endpoint.trim_end_matches('/'));

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs(),
            "OllamaService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// Performs a **non-streaming** chat request via `/api/chat`.
    ///
    /// Mapped options:
    /// - `model`       ← `request.config.model` or `self.cfg.model`
    /// - `num_predict` ← `request.config.max_tokens` or `self.cfg.max_tokens`
    /// - `temperature` ← `self.cfg.temperature`
    ///
    /// # Errors
    /// - [`AiLlmError::StreamingUnsupported`] if `request.config.streaming` is set
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client errors
    /// - [`AiLlmError::Provider`] with `Decode` if response cannot be parsed
    #[instrument(skip_all, fields(model = tracing::field::Empty))]
    pub async fn chat(&self, request: &ChatRequest) -> Result<Completion, AiLlmError> {
        if request.config.streaming {
            return Err(AiLlmError::StreamingUnsupported);
        }

        let started = Instant::now();
        let body = OllamaChatRequest::from_request(&self.cfg, request);
        tracing::Span::current().record("model", body.model);

        debug!(prompt_len = request.prompt_len(), "POST {}", self.url_chat);
        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "Ollama /api/chat returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: OllamaChatResponse = resp.json().await.map_err(|e| {
            error!(
                error = %e,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode /api/chat response"
            );
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!("serde error: {e}; ensure `stream=false` is used")),
            )
        })?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            completion_len = out.message.content.len(),
            "chat completion completed"
        );

        Ok(Completion {
            content: out.message.content,
        })
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/chat` (non-streaming).
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

impl<'a> OllamaChatRequest<'a> {
    fn from_request(cfg: &'a LlmModelConfig, request: &'a ChatRequest) -> Self {
        let options = ChatOptions {
            temperature: cfg.temperature,
            num_predict: request.config.max_tokens.or(cfg.max_tokens),
        };

        Self {
            model: request.config.model.as_deref().unwrap_or(&cfg.model),
            messages: request
                .messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: (!options.is_empty()).then_some(options),
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl ChatOptions {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.num_predict.is_none()
    }
}

/// Response body for `/api/chat`; the text lives in `message.content`.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessageOut,
}

#[derive(Debug, Deserialize)]
struct OllamaMessageOut {
    #[serde(default)]
    content: String,
}
