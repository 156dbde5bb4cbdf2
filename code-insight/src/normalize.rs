//! Response normalizer: extract → validate → clamp, or fall back.
//!
//! Model output is free text that is only *asked* to be JSON. This module
//! recovers a typed value from it and never fails: when the text cannot be
//! trusted the caller's fallback is returned, tagged with the reason so it
//! can be logged.
//!
//! Steps, for a schema of expected fields:
//! 1. strip Markdown code fences, a BOM and surrounding whitespace;
//! 2. cut the span from the first `{` to the last `}`;
//! 3. decode that span as a JSON object;
//! 4. type-check each field of the schema;
//! 5. round and clamp integer fields into their declared range;
//! 6. deserialize into the target type.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Expected JSON type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    /// A number that is rounded to the nearest integer and clamped to `[min, max]`.
    IntegerInRange { min: i64, max: i64 },
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number | FieldKind::IntegerInRange { .. } => "number",
        }
    }
}

/// One field the model is expected to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    /// Optional fields may be absent or `null`; the target type's serde
    /// default then applies.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Why a completion was replaced by the fallback value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No `{ … }` span in the text.
    NoJsonSpan,
    /// The span was not valid JSON, or did not fit the target type.
    Decode(String),
    /// Valid JSON, but not an object.
    NotAnObject,
    /// A schema field was missing or had the wrong type.
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoJsonSpan => f.write_str("no JSON object found in completion"),
            FallbackReason::Decode(e) => write!(f, "JSON decode failed: {e}"),
            FallbackReason::NotAnObject => f.write_str("JSON value is not an object"),
            FallbackReason::InvalidField { field, expected } => {
                write!(f, "field `{field}` missing or not a {expected}")
            }
        }
    }
}

/// Outcome of normalization. Both variants carry a usable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<T> {
    Parsed(T),
    Fallback { value: T, reason: FallbackReason },
}

impl<T> Normalized<T> {
    pub fn value(&self) -> &T {
        match self {
            Normalized::Parsed(v) | Normalized::Fallback { value: v, .. } => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Normalized::Parsed(v) | Normalized::Fallback { value: v, .. } => v,
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Normalized::Parsed(_) => None,
            Normalized::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Normalized::Fallback { .. })
    }
}

/// A result type that can be recovered from a completion.
pub trait Structured: DeserializeOwned + Sized {
    /// Fields the model must (or may) return.
    const SCHEMA: &'static [FieldSpec];

    /// Safe default built from the raw completion text.
    fn fallback(raw: &str) -> Self;

    fn from_completion(raw: &str) -> Normalized<Self> {
        normalize_with(raw, Self::SCHEMA, Self::fallback)
    }
}

/// Removes ```` ```json ```` / ```` ``` ```` fences and a BOM, then trims.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```", "")
        .replace('\u{feff}', "")
        .trim()
        .to_string()
}

/// Slice from the first `{` to the last `}` (inclusive), if they are ordered.
pub fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Rounds half away from zero and clamps into `[min, max]`.
pub fn round_clamp(value: f64, min: i64, max: i64) -> i64 {
    // Clamp in f64 first so huge inputs cannot overflow the cast.
    value.round().clamp(min as f64, max as f64) as i64
}

/// Generic extract-validate-clamp-or-fallback over an explicit schema.
pub fn normalize_with<T, F>(raw: &str, schema: &[FieldSpec], fallback: F) -> Normalized<T>
where
    T: DeserializeOwned,
    F: FnOnce(&str) -> T,
{
    match try_normalize(raw, schema) {
        Ok(value) => Normalized::Parsed(value),
        Err(reason) => Normalized::Fallback {
            value: fallback(raw),
            reason,
        },
    }
}

fn try_normalize<T: DeserializeOwned>(raw: &str, schema: &[FieldSpec]) -> Result<T, FallbackReason> {
    let cleaned = strip_code_fences(raw);
    let span = json_span(&cleaned).ok_or(FallbackReason::NoJsonSpan)?;

    let value: Value =
        serde_json::from_str(span).map_err(|e| FallbackReason::Decode(e.to_string()))?;
    let Value::Object(mut obj) = value else {
        return Err(FallbackReason::NotAnObject);
    };

    validate_and_clamp(&mut obj, schema)?;

    serde_json::from_value(Value::Object(obj)).map_err(|e| FallbackReason::Decode(e.to_string()))
}

fn validate_and_clamp(obj: &mut Map<String, Value>, schema: &[FieldSpec]) -> Result<(), FallbackReason> {
    for spec in schema {
        let invalid = || FallbackReason::InvalidField {
            field: spec.name,
            expected: spec.kind.expected(),
        };

        match obj.get(spec.name) {
            None | Some(Value::Null) if !spec.required => {
                obj.remove(spec.name);
                continue;
            }
            None | Some(Value::Null) => return Err(invalid()),
            Some(_) => {}
        }

        let slot = obj.get_mut(spec.name).ok_or_else(invalid)?;
        match spec.kind {
            FieldKind::String if slot.is_string() => {}
            FieldKind::Number if slot.is_number() => {}
            FieldKind::IntegerInRange { min, max } => {
                let n = slot.as_f64().ok_or_else(invalid)?;
                *slot = Value::from(round_clamp(n, min, max));
            }
            _ => return Err(invalid()),
        }
    }
    Ok(())
}
