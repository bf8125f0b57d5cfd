//! Flattening of structured documents into [`ConfigMapping`]s.
//!
//! Both formats accept the same two structural forms:
//! - **Flat** - a `keyValueProperties` block whose direct children are
//!   key-value pairs
//! - **Nested** - an `xmlStructure` block of arbitrary depth, flattened into
//!   `.`-joined key paths (the block name itself is not part of the key)
//!
//! A block is either the document root or a direct child of it. When both
//! blocks are present the flat block is applied first.

mod json;
mod xml;

pub use json::flatten_json;
pub use xml::flatten_xml;

use crate::error::DocumentError;
use crate::types::{ConfigMapping, DocumentFormat, KEY_SEPARATOR};

/// Name of the flat key-value block.
pub const FLAT_BLOCK: &str = "keyValueProperties";

/// Name of the nested block.
pub const NESTED_BLOCK: &str = "xmlStructure";

/// Flatten a document of the given format.
pub fn flatten(format: DocumentFormat, content: &str) -> Result<ConfigMapping, DocumentError> {
    match format {
        DocumentFormat::Xml => flatten_xml(content),
        DocumentFormat::Json => flatten_json(content),
    }
}

/// Append a segment to a key path.
pub(crate) fn join_key(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}{KEY_SEPARATOR}{segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("", "db"), "db");
        assert_eq!(join_key("db", "host"), "db.host");
        assert_eq!(join_key("db.pool", "0"), "db.pool.0");
    }

    #[test]
    fn test_same_keys_from_both_formats() {
        let xml = r#"
<settings>
  <xmlStructure>
    <db><host>localhost</host><port>5432</port></db>
  </xmlStructure>
</settings>"#;
        let json = r#"{"xmlStructure": {"db": {"host": "localhost", "port": 5432}}}"#;

        let from_xml = flatten(DocumentFormat::Xml, xml).unwrap();
        let from_json = flatten(DocumentFormat::Json, json).unwrap();
        assert_eq!(from_xml, from_json);
    }
}
