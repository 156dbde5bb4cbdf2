//! Default LLM config loaded from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER`     = `gemini` (default) or `ollama`
//! - `LLM_MODEL`        = default model (Gemini falls back to `gemini-2.5-flash`)
//! - `LLM_MAX_TOKENS`   = optional token cap when a call sets none
//! - `LLM_TEMPERATURE`  = optional sampling temperature (`0.0..=2.0`)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (default 60)
//!
//! Gemini-specific:
//! - `GEMINI_API_KEY` = API key (mandatory)
//! - `GEMINI_URL`     = endpoint (default `https://generativelanguage.googleapis.com`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, EnvLookup, must_var, opt_f32, opt_u64, opt_var, process_env,
        validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Builds the model config from the process environment.
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_from_lookup(&process_env)
}

/// Builds the model config from an arbitrary variable lookup.
///
/// # Errors
///
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_PROVIDER`
/// - [`ConfigError::MissingVar`] when a provider's mandatory variable is absent
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::OutOfRange`] for bad numbers
/// - [`ConfigError::InvalidFormat`] when an endpoint lacks an http(s) scheme
pub fn config_from_lookup(env: EnvLookup<'_>) -> Result<LlmModelConfig, AiLlmError> {
    let provider = match opt_var(env, "LLM_PROVIDER") {
        Some(raw) => raw.parse::<LlmProvider>()?,
        None => LlmProvider::Gemini,
    };

    let max_tokens = opt_u64(env, "LLM_MAX_TOKENS")?
        .map(|v| {
            u32::try_from(v).map_err(|_| ConfigError::InvalidNumber {
                var: "LLM_MAX_TOKENS",
                reason: "expected u32",
            })
        })
        .transpose()?;

    let temperature = opt_f32(env, "LLM_TEMPERATURE")?;
    if let Some(t) = temperature {
        validate_range_f32("temperature", t, 0.0, 2.0)?;
    }

    let timeout_secs = opt_u64(env, "LLM_TIMEOUT_SECS")?;

    let cfg = match provider {
        LlmProvider::Gemini => {
            let endpoint =
                opt_var(env, "GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string());
            validate_http_endpoint("GEMINI_URL", &endpoint)?;

            LlmModelConfig {
                provider,
                model: opt_var(env, "LLM_MODEL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                endpoint,
                api_key: Some(must_var(env, "GEMINI_API_KEY")?),
                max_tokens,
                temperature,
                timeout_secs,
            }
        }
        LlmProvider::Ollama => LlmModelConfig {
            provider,
            model: must_var(env, "LLM_MODEL")?,
            endpoint: ollama_endpoint(env)?,
            api_key: None,
            max_tokens,
            temperature,
            timeout_secs,
        },
    };

    Ok(cfg)
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint(env: EnvLookup<'_>) -> Result<String, AiLlmError> {
    if let Some(url) = opt_var(env, "OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = opt_var(env, "OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}
