//! Process-wide tracing setup.
//!
//! Provider calls (`ai_llm_service::*`) get their own fmt layer with source
//! locations and span-close timings; everything else goes through a compact
//! application layer. Both share one `EnvFilter`.

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::fmt::format::{FmtSpan, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefix of every event emitted by this crate.
pub const TARGET_PREFIX: &str = "ai_llm_service";

const DEFAULT_FILTER: &str = "info";

/// Log settings read from `RUST_LOG`, `LLM_LOG_LEVEL` and `NO_COLOR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Base `EnvFilter` directives.
    pub filter: String,
    /// Level applied to provider calls on top of `filter`.
    pub llm_level: Level,
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            llm_level: Level::INFO,
            ansi: io::stdout().is_terminal(),
        }
    }
}

impl TelemetryConfig {
    /// Unknown `LLM_LOG_LEVEL` values keep the default level.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            filter: env("RUST_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.filter),
            llm_level: env("LLM_LOG_LEVEL")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.llm_level),
            ansi: defaults.ansi && env("NO_COLOR").is_none_or(|v| v.is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }

    /// Base directives plus `ai_llm_service=<llm_level>`; an unparsable base
    /// falls back to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
            .add_directive(llm_directive(self.llm_level))
    }
}

/// `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct UtcSeconds;

impl FormatTime for UtcSeconds {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        w.write_str(&chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

pub fn is_library_target(target: &str) -> bool {
    target.starts_with(TARGET_PREFIX)
}

fn llm_directive(level: Level) -> Directive {
    format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase())
        .parse()
        .unwrap_or_else(|_| Directive::from(LevelFilter::from_level(level)))
}

/// Fmt layer for provider calls only. Closed spans report how long each
/// `chat` call took.
pub fn llm_layer<S>(ansi: bool) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(UtcSeconds)
        .with_target(true)
        .with_ansi(ansi)
        .with_span_events(FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(filter::filter_fn(|meta| is_library_target(meta.target())))
}

/// Fmt layer for everything outside this crate (HTTP handlers, tower-http).
pub fn app_layer<S>(ansi: bool) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(UtcSeconds)
        .with_target(true)
        .with_ansi(ansi)
        .compact()
        .with_filter(filter::filter_fn(|meta| !is_library_target(meta.target())))
}

/// Installs the global subscriber. Fails if one is already set.
pub fn init(cfg: &TelemetryConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(cfg.env_filter())
        .with(app_layer(cfg.ansi))
        .with(llm_layer(cfg.ansi))
        .try_init()
}
