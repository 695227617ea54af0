//! Core types for ragloop.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, RetrievalError};

/// Reviewer feedback keyed by facet label.
///
/// Insertion order matters: when several keys normalize to the same facet,
/// the one inserted last wins.
pub type FeedbackMap = IndexMap<String, String>;

/// Read access to the free text of a spec-like record.
///
/// The ranker and gap detector only ever look at this text, so any record
/// shape can take part as long as it can hand it out. Records without text
/// return `""`.
pub trait SpecText {
    /// Returns the record's text, or an empty string when it has none.
    fn spec_text(&self) -> &str;
}

impl SpecText for str {
    fn spec_text(&self) -> &str {
        self
    }
}

impl SpecText for String {
    fn spec_text(&self) -> &str {
        self.as_str()
    }
}

impl SpecText for Value {
    fn spec_text(&self) -> &str {
        self.get("text").and_then(Value::as_str).unwrap_or("")
    }
}

impl<T: SpecText + ?Sized> SpecText for &T {
    fn spec_text(&self) -> &str {
        (**self).spec_text()
    }
}

/// A candidate text fragment.
///
/// Only `text` is inspected. Every other field is kept in `extra` and written
/// back unchanged on serialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    /// Free-form text; empty when the record carries none or a non-string
    #[serde(default, deserialize_with = "text_or_empty")]
    pub text: String,
    /// Pass-through fields (ids, sources, scores from upstream, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Spec {
    /// Creates a spec with text and no extra fields.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: Map::new(),
        }
    }

    /// Adds a pass-through field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Looks up a pass-through field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Parses a JSON array of spec records.
    pub fn parse_list(json: &str) -> Result<Vec<Spec>> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(RetrievalError::from))
                .collect(),
            other => Err(RetrievalError::InvalidInput(format!(
                "expected a JSON array of specs, found {}",
                json_kind(&other)
            ))),
        }
    }
}

impl SpecText for Spec {
    fn spec_text(&self) -> &str {
        &self.text
    }
}

impl From<&str> for Spec {
    fn from(text: &str) -> Self {
        Spec::new(text)
    }
}

/// Same reading as `SpecText for Value`: anything but a string is empty text.
fn text_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        _ => Ok(String::new()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_text_defaults_to_empty() {
        assert_eq!(json!({"id": 3}).spec_text(), "");
        assert_eq!(json!({"text": 7}).spec_text(), "");
        assert_eq!(json!({"text": "Rate limits"}).spec_text(), "Rate limits");
    }

    #[test]
    fn test_spec_keeps_extra_fields() {
        let spec: Spec = serde_json::from_value(json!({
            "id": "S-1",
            "text": "Audit logging",
            "source": "judge"
        }))
        .unwrap();

        assert_eq!(spec.text, "Audit logging");
        assert_eq!(spec.field("id"), Some(&json!("S-1")));

        let back = serde_json::to_value(&spec).unwrap();
        assert_eq!(back["source"], json!("judge"));
        assert_eq!(back["text"], json!("Audit logging"));
    }

    #[test]
    fn test_spec_missing_or_null_text() {
        let missing: Spec = serde_json::from_value(json!({"id": 1})).unwrap();
        let null: Spec = serde_json::from_value(json!({"id": 2, "text": null})).unwrap();
        assert_eq!(missing.spec_text(), "");
        assert_eq!(null.spec_text(), "");
    }

    #[test]
    fn test_non_string_text_reads_as_empty() {
        let specs = Spec::parse_list(
            r#"[{"id": "a", "text": 5}, {"id": "b", "text": ["x"]}, {"id": "c", "text": "ok"}]"#,
        )
        .unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].spec_text(), "");
        assert_eq!(specs[1].spec_text(), "");
        assert_eq!(specs[2].spec_text(), "ok");
        assert_eq!(specs[0].field("id"), Some(&json!("a")));

        // agrees with the untyped record view
        let raw = json!({"id": "a", "text": 5});
        assert_eq!(raw.spec_text(), specs[0].spec_text());
    }

    #[test]
    fn test_parse_list_rejects_non_array() {
        let err = Spec::parse_list(r#"{"text": "x"}"#).unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidInput(_)));
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_parse_list() {
        let specs = Spec::parse_list(r#"[{"text": "a b"}, {"id": 9}]"#).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].text, "");
    }
}
