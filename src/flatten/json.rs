//! JSON flattener built on `serde_json::Value`.

use super::{FLAT_BLOCK, NESTED_BLOCK, join_key};
use crate::error::DocumentError;
use crate::types::ConfigMapping;
use serde_json::Value;

/// Flatten a JSON document.
///
/// The top level must be an object holding a `keyValueProperties` and/or an
/// `xmlStructure` field. Objects recurse by field name, arrays by zero-based
/// index. `null` means "not specified" and contributes nothing. A leading
/// byte-order mark is skipped.
pub fn flatten_json(content: &str) -> Result<ConfigMapping, DocumentError> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    if content.trim().is_empty() {
        return Err(DocumentError::Empty);
    }
    let document: Value = serde_json::from_str(content)?;
    let Value::Object(root) = document else {
        return Err(DocumentError::UnrecognizedStructure);
    };

    let flat = root.get(FLAT_BLOCK);
    let nested = root.get(NESTED_BLOCK);
    if flat.is_none() && nested.is_none() {
        return Err(DocumentError::UnrecognizedStructure);
    }

    let mut mapping = ConfigMapping::new();
    if let Some(block) = flat {
        let Value::Object(entries) = block else {
            return Err(DocumentError::InvalidBlock(FLAT_BLOCK));
        };
        for (key, value) in entries {
            if let Some(text) = value_text(value) {
                mapping.insert(key.clone(), text);
            }
        }
    }
    if let Some(block) = nested {
        if !block.is_object() {
            return Err(DocumentError::InvalidBlock(NESTED_BLOCK));
        }
        flatten_value(block, "", &mut mapping);
    }
    Ok(mapping)
}

/// String form of a value: strings verbatim, everything else as compact JSON.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn flatten_value(value: &Value, prefix: &str, out: &mut ConfigMapping) {
    match value {
        Value::Object(fields) => {
            for (name, child) in fields {
                flatten_value(child, &join_key(prefix, name), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_value(child, &join_key(prefix, &index.to_string()), out);
            }
        }
        leaf => {
            if let Some(text) = value_text(leaf) {
                out.insert(prefix.to_string(), text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_block() {
        let doc = r#"{
            "keyValueProperties": {
                "name": "orders",
                "retries": 3,
                "enabled": false,
                "ratio": 0.5,
                "unset": null,
                "tags": ["a", "b"]
            }
        }"#;
        let mapping = flatten_json(doc).unwrap();
        assert_eq!(mapping["name"], "orders");
        assert_eq!(mapping["retries"], "3");
        assert_eq!(mapping["enabled"], "false");
        assert_eq!(mapping["ratio"], "0.5");
        assert_eq!(mapping["tags"], r#"["a","b"]"#);
        assert!(!mapping.contains_key("unset"));
    }

    #[test]
    fn test_nested_block() {
        let doc = r#"{
            "xmlStructure": {
                "server": {"host": "0.0.0.0", "port": 8080},
                "replicas": [{"host": "r1"}, {"host": "r2"}],
                "features": ["x", null, "z"]
            }
        }"#;
        let mapping = flatten_json(doc).unwrap();
        assert_eq!(mapping["server.host"], "0.0.0.0");
        assert_eq!(mapping["server.port"], "8080");
        assert_eq!(mapping["replicas.0.host"], "r1");
        assert_eq!(mapping["replicas.1.host"], "r2");
        assert_eq!(mapping["features.0"], "x");
        assert_eq!(mapping["features.2"], "z");
        assert!(!mapping.contains_key("features.1"));
    }

    #[test]
    fn test_nested_block_applied_after_flat() {
        let doc = r#"{
            "keyValueProperties": {"a": "flat"},
            "xmlStructure": {"a": "nested", "b": {"c": "1"}}
        }"#;
        let mapping = flatten_json(doc).unwrap();
        assert_eq!(mapping["a"], "nested");
        assert_eq!(mapping["b.c"], "1");
    }

    #[test]
    fn test_empty_blocks_are_recognized() {
        let mapping = flatten_json(r#"{"keyValueProperties": {}}"#).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_unrecognized_structure() {
        let err = flatten_json(r#"{"server": {"port": 1}}"#).unwrap_err();
        assert!(matches!(err, DocumentError::UnrecognizedStructure));

        let err = flatten_json("[1, 2]").unwrap_err();
        assert!(matches!(err, DocumentError::UnrecognizedStructure));
    }

    #[test]
    fn test_invalid_blocks() {
        let err = flatten_json(r#"{"keyValueProperties": [1]}"#).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidBlock(FLAT_BLOCK)));

        let err = flatten_json(r#"{"xmlStructure": "flat"}"#).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidBlock(NESTED_BLOCK)));
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let doc = "\u{FEFF}{\"keyValueProperties\": {\"k\": \"v\"}}";
        let mapping = flatten_json(doc).unwrap();
        assert_eq!(mapping["k"], "v");
        assert!(matches!(flatten_json("\u{FEFF}").unwrap_err(), DocumentError::Empty));
    }

    #[test]
    fn test_syntax_error_and_empty() {
        assert!(matches!(
            flatten_json("{\"keyValueProperties\": ").unwrap_err(),
            DocumentError::Json(_)
        ));
        assert!(matches!(flatten_json("  \n").unwrap_err(), DocumentError::Empty));
    }
}
