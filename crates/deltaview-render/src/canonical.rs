//! Canonicalization and parsing of input documents.
//!
//! Object keys are sorted recursively before diffing so that key order never
//! produces spurious differences.

use deltaview_types::JsonValue;
use serde_json::Map;
use tracing::warn;

use crate::error::{RenderError, RenderResult, Side};

/// Recursively sort object keys. Array element order is preserved.
pub fn sort_keys(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(sort_keys).collect()),
        JsonValue::Object(map) => {
            let mut entries: Vec<(&String, &JsonValue)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, JsonValue> = entries
                .into_iter()
                .map(|(key, item)| (key.clone(), sort_keys(item)))
                .collect();
            JsonValue::Object(sorted)
        }
        scalar => scalar.clone(),
    }
}

/// Parse a JSON document, logging and returning `None` on failure.
pub fn parse_json(text: &str) -> Option<JsonValue> {
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "failed to parse JSON document");
            None
        }
    }
}

/// Parse a JSON document, naming the failing side in the error.
pub fn parse_document(text: &str, side: Side) -> RenderResult<JsonValue> {
    serde_json::from_str(text).map_err(|e| {
        warn!(%side, error = %e, "failed to parse JSON document");
        RenderError::Parse {
            side,
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_nested_keys() {
        let value = json!({"b": {"z": 1, "a": [{"y": 0, "x": 1}]}, "a": null});
        let sorted = sort_keys(&value);
        assert_eq!(sorted, value);

        let keys: Vec<_> = sorted["b"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "z"]);
        let inner: Vec<_> = sorted["b"]["a"][0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(inner, vec!["x", "y"]);
    }

    #[test]
    fn preserves_array_order_and_scalars() {
        assert_eq!(sort_keys(&json!([3, 1, 2])), json!([3, 1, 2]));
        assert_eq!(sort_keys(&json!("s")), json!("s"));
    }

    #[test]
    fn parse_json_returns_none_on_garbage() {
        assert_eq!(parse_json("{\"a\": 1}"), Some(json!({"a": 1})));
        assert_eq!(parse_json("{not json"), None);
        assert_eq!(parse_json(""), None);
    }

    #[test]
    fn parse_document_names_the_side() {
        let err = parse_document("[1,", Side::To).unwrap_err();
        assert!(matches!(err, RenderError::Parse { side: Side::To, .. }));
        assert!(err.to_string().starts_with("failed to parse to document"));
    }
}
