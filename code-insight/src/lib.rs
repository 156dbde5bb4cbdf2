//! Pure, synchronous building blocks shared by the GitLore endpoints:
//!
//! - [`prompt`]: per-endpoint prompt templates and input truncation
//! - [`normalize`]: turns free-text completions into validated structures
//! - [`assessment`]: the structured results and their fallbacks
//! - [`complexity`]: deterministic, model-independent size/import score
//!
//! Nothing here performs I/O; handlers own the model call and logging.

pub mod assessment;
pub mod complexity;
pub mod normalize;
pub mod prompt;

pub use assessment::{FileSummary, ImpactAssessment, ImpactVerdict, RiskAssessment};
pub use complexity::complexity_score;
pub use normalize::{FallbackReason, Normalized, Structured};
pub use prompt::{BuiltPrompt, PromptKind};
