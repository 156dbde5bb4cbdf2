//! Result types recovered from model completions.

use serde::{Deserialize, Serialize};

use crate::normalize::{FieldKind, FieldSpec, Structured};

pub const RISK_INVALID_FORMAT_REASON: &str = "AI returned invalid format. Check server logs.";
pub const RISK_UNAUTHORIZED_REASON: &str = "Unauthorized access.";
pub const RISK_NO_CODE_REASON: &str = "No code selected.";
pub const RISK_INVALID_BODY_REASON: &str = "Invalid request body.";

pub const UNKNOWN_RISK_LABEL: &str = "Unknown";
pub const UNKNOWN_RISK_COLOR: &str = "#888888";

pub const FILE_SUMMARY_FALLBACK: &str = "Repo Narrator could not parse a structured response, \
but this file participates in the repository's behavior as shown in the code.";

/// Security score of a single function.
///
/// Parsed scores are always in `1..=10`; `0` only appears in handler-made
/// soft failures and `5` in the invalid-format fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub reason: String,
}

impl RiskAssessment {
    /// Soft failure reported with a `200` status.
    pub fn soft_fail(reason: impl Into<String>) -> Self {
        Self {
            score: 0,
            reason: reason.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::soft_fail(RISK_UNAUTHORIZED_REASON)
    }

    pub fn ai_service_error(detail: impl std::fmt::Display) -> Self {
        Self::soft_fail(format!("AI service error: {detail}"))
    }
}

impl Structured for RiskAssessment {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("score", FieldKind::IntegerInRange { min: 1, max: 10 }),
        FieldSpec::required("reason", FieldKind::String),
    ];

    fn fallback(_raw: &str) -> Self {
        Self {
            score: 5,
            reason: RISK_INVALID_FORMAT_REASON.to_string(),
        }
    }
}

/// Model-derived half of an impact assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactVerdict {
    pub risk_label: String,
    pub risk_color: String,
    pub summary: String,
}

impl Structured for ImpactVerdict {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("riskLabel", FieldKind::String),
        FieldSpec::required("riskColor", FieldKind::String),
        FieldSpec::required("summary", FieldKind::String),
    ];

    /// Keeps the raw completion as the summary so the user still sees it.
    fn fallback(raw: &str) -> Self {
        Self {
            risk_label: UNKNOWN_RISK_LABEL.to_string(),
            risk_color: UNKNOWN_RISK_COLOR.to_string(),
            summary: raw.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAssessment {
    pub risk_label: String,
    pub risk_color: String,
    pub summary: String,
    /// Complexity score in `0..=100`, computed locally.
    pub score: u8,
}

impl ImpactAssessment {
    pub fn new(verdict: ImpactVerdict, score: u8) -> Self {
        Self {
            risk_label: verdict.risk_label,
            risk_color: verdict.risk_color,
            summary: verdict.summary,
            score,
        }
    }
}

/// Repo Narrator description of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub summary: String,
    #[serde(default)]
    pub mermaid: String,
}

impl Structured for FileSummary {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("summary", FieldKind::String),
        FieldSpec::optional("mermaid", FieldKind::String),
    ];

    fn fallback(_raw: &str) -> Self {
        Self {
            summary: FILE_SUMMARY_FALLBACK.to_string(),
            mermaid: String::new(),
        }
    }
}
