//! Provider-agnostic chat types and the [`ChatModel`] seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error_handler::AiLlmError;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One message of a conversation sent to the model.
///
/// Messages are built per request and dropped once the completion returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Stable label of the prompt that produced this message (e.g. `risk-prompt`).
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a `user` message stamped with the current time.
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ChatRole::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Per-call generation settings.
///
/// `model = None` selects the model configured for the service;
/// `max_tokens = None` leaves the limit to the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub streaming: bool,
}

impl ChatConfig {
    /// Non-streaming config with a token cap, using the service default model.
    pub const fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            model: None,
            max_tokens: Some(max_tokens),
            streaming: false,
        }
    }
}

/// Input of a single completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub config: ChatConfig,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>, config: ChatConfig) -> Self {
        Self { messages, config }
    }

    /// Total characters across all message bodies; used for log fields.
    pub fn prompt_len(&self) -> usize {
        self.messages.iter().map(|m| m.content.chars().count()).sum()
    }
}

/// Raw text produced by the model for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
}

impl Completion {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Boundary over the text-generation backend.
///
/// Implementations perform exactly one upstream call per invocation and do
/// not retry. Failures surface as [`AiLlmError`].
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<Completion, AiLlmError>;
}
