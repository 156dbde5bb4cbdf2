//! Google Gemini service for chat completions.
//!
//! Minimal, non-streaming client around the `generateContent` REST call:
//! - POST {endpoint}/v1beta/models/{model}:generateContent
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::Gemini`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    chat::{ChatMessage, ChatRequest, ChatRole, Completion},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
    },
};

/// Thin client for the Gemini API.
///
/// Keeps a preconfigured `reqwest::Client` (timeout + API key header).
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    base: String,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not Gemini
    /// - [`AiLlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Gemini {
            return Err(
                ProviderError::new(Provider::Gemini, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::new(Provider::Gemini, ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                Provider::Gemini,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let mut headers = header::HeaderMap::new();
        let mut key_value = header::HeaderValue::from_str(&api_key).map_err(|e| {
            ProviderError::new(
                Provider::Gemini,
                ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
            )
        })?;
        key_value.set_sensitive(true);
        headers.insert("x-goog-api-key", key_value);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs()))
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs(),
            "GeminiService initialized"
        );

        Ok(Self { client, cfg, base })
    }

    /// Performs a **non-streaming** `generateContent` call.
    ///
    /// # Errors
    /// - [`AiLlmError::StreamingUnsupported`] if `request.config.streaming` is set
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`AiLlmError::Provider`] with `EmptyCompletion` if no candidate is returned
    #[instrument(skip_all, fields(model = tracing::field::Empty))]
    pub async fn chat(&self, request: &ChatRequest) -> Result<Completion, AiLlmError> {
        if request.config.streaming {
            return Err(AiLlmError::StreamingUnsupported);
        }

        let started = Instant::now();
        let model = request.config.model.as_deref().unwrap_or(&self.cfg.model);
        tracing::Span::current().record("model", model);

        let url = format!("{}/v1beta/models/{}:generateContent", self.base, model);
        let body = GenerateContentRequest::from_request(&self.cfg, request);

        debug!(
            prompt_len = request.prompt_len(),
            messages = request.messages.len(),
            "POST {}", url
        );

        let resp = self.client.post(&url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "Gemini generateContent returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::Gemini,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: GenerateContentResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode generateContent response"
                );
                return Err(ProviderError::new(
                    Provider::Gemini,
                    ProviderErrorKind::Decode(format!(
                        "serde error: {e}; expected `candidates[0].content.parts[].text`"
                    )),
                )
                .into());
            }
        };

        let candidate = out.candidates.into_iter().next().ok_or_else(|| {
            error!(
                latency_ms = started.elapsed().as_millis(),
                "Gemini returned no candidates"
            );
            ProviderError::new(Provider::Gemini, ProviderErrorKind::EmptyCompletion)
        })?;

        // A candidate without parts (e.g. cut by the token cap) yields empty text.
        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        info!(
            latency_ms = started.elapsed().as_millis(),
            completion_len = content.len(),
            finish_reason = candidate.finish_reason.as_deref().unwrap_or("-"),
            "generateContent completed"
        );

        Ok(Completion { content })
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    /// Maps chat messages onto Gemini roles: `assistant` becomes `model`,
    /// `system` messages are merged into `systemInstruction`.
    fn from_request(cfg: &LlmModelConfig, request: &'a ChatRequest) -> Self {
        let mut contents = Vec::with_capacity(request.messages.len());
        let mut system_parts = Vec::new();

        for msg in &request.messages {
            match msg.role {
                ChatRole::System => system_parts.push(Part::from(msg)),
                ChatRole::User => contents.push(Content {
                    role: Some("user"),
                    parts: vec![Part::from(msg)],
                }),
                ChatRole::Assistant => contents.push(Content {
                    role: Some("model"),
                    parts: vec![Part::from(msg)],
                }),
            }
        }

        let system_instruction = (!system_parts.is_empty()).then(|| Content {
            role: None,
            parts: system_parts,
        });

        Self {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                max_output_tokens: request.config.max_tokens.or(cfg.max_tokens),
                temperature: cfg.temperature,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> From<&'a ChatMessage> for Part<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Part { text: &msg.content }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatConfig;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "gemini-2.5-flash".into(),
            endpoint: "https://generativelanguage.googleapis.com".into(),
            api_key: Some("k".into()),
            max_tokens: Some(64),
            temperature: Some(0.2),
            timeout_secs: None,
        }
    }

    #[test]
    fn request_maps_roles_and_token_cap() {
        let mut system = ChatMessage::user("s", "be brief");
        system.role = ChatRole::System;
        let mut assistant = ChatMessage::user("a", "earlier answer");
        assistant.role = ChatRole::Assistant;

        let req = ChatRequest::new(
            vec![system, ChatMessage::user("u", "question"), assistant],
            ChatConfig::with_max_tokens(150),
        );
        let body = serde_json::to_value(GenerateContentRequest::from_request(&cfg(), &req)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "question");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 150);
    }

    #[test]
    fn request_falls_back_to_config_token_cap() {
        let req = ChatRequest::new(vec![ChatMessage::user("u", "q")], ChatConfig::default());
        let body = serde_json::to_value(GenerateContentRequest::from_request(&cfg(), &req)).unwrap();

        assert_eq!(body["generationConfig"]["maxOutputTokens"], 64);
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn constructor_validates_config() {
        let mut c = cfg();
        c.api_key = None;
        assert!(GeminiService::new(c).is_err());

        let mut c = cfg();
        c.provider = LlmProvider::Ollama;
        assert!(GeminiService::new(c).is_err());

        let mut c = cfg();
        c.endpoint = "generativelanguage.googleapis.com".into();
        assert!(GeminiService::new(c).is_err());

        assert!(GeminiService::new(cfg()).is_ok());
    }
}
