//! Chat-completion client used by the GitLore API.
//!
//! The crate hides the concrete text-generation provider behind the
//! [`ChatModel`] trait. Handlers only ever see [`ChatRequest`] in and
//! [`Completion`] out; which provider answers is decided once at startup from
//! environment configuration (see [`config::default_config`]).

pub mod chat;
pub mod chat_service;
pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use chat::{ChatConfig, ChatMessage, ChatModel, ChatRequest, ChatRole, Completion};
pub use chat_service::LlmChatService;
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, Result};
