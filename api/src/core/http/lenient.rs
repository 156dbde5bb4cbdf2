//! Forgiving field decoding for extension request bodies.
//!
//! Clients send loosely typed JSON. A required text field that is absent,
//! `null`, empty or not a string decodes to `None`, so the handler can answer
//! with its own "Missing …" message instead of a generic decode rejection.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes any JSON value into `Some(text)` only for a non-empty string.
///
/// Use with `#[serde(default, deserialize_with = "lenient::non_empty_string")]`.
pub fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Like [`non_empty_string`], but any other truthy value is kept as text:
/// non-zero numbers, `true`, and arrays or objects (as compact JSON).
/// `false`, `0` and `null` decode to `None`.
pub fn truthy_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        v @ (Value::Array(_) | Value::Object(_)) => Some(v.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "non_empty_string")]
        code: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct Search {
        #[serde(default, deserialize_with = "truthy_text")]
        query: Option<String>,
    }

    fn query(json: &str) -> Option<String> {
        serde_json::from_str::<Search>(json).unwrap().query
    }

    fn code(json: &str) -> Option<String> {
        serde_json::from_str::<Body>(json).unwrap().code
    }

    #[test]
    fn only_non_empty_strings_survive() {
        assert_eq!(code(r#"{"code": "fn a() {}"}"#).as_deref(), Some("fn a() {}"));
        assert_eq!(code(r#"{"code": ""}"#), None);
        assert_eq!(code(r#"{"code": 42}"#), None);
        assert_eq!(code(r#"{"code": null}"#), None);
        assert_eq!(code(r#"{"code": ["x"]}"#), None);
        assert_eq!(code(r#"{}"#), None);
        assert_eq!(code(r#"{"other": 1}"#), None);
    }

    #[test]
    fn truthy_values_become_text() {
        assert_eq!(query(r#"{"query": "where?"}"#).as_deref(), Some("where?"));
        assert_eq!(query(r#"{"query": 42}"#).as_deref(), Some("42"));
        assert_eq!(query(r#"{"query": 1.5}"#).as_deref(), Some("1.5"));
        assert_eq!(query(r#"{"query": true}"#).as_deref(), Some("true"));
        assert_eq!(query(r#"{"query": ["a", 1]}"#).as_deref(), Some(r#"["a",1]"#));
    }

    #[test]
    fn falsy_values_are_missing() {
        for json in [
            r#"{"query": ""}"#,
            r#"{"query": 0}"#,
            r#"{"query": false}"#,
            r#"{"query": null}"#,
            r#"{}"#,
        ] {
            assert_eq!(query(json), None, "{json}");
        }
    }
}
