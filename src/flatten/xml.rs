//! XML flattener built on `quick-xml` events.

use super::{FLAT_BLOCK, NESTED_BLOCK, join_key};
use crate::error::DocumentError;
use crate::types::ConfigMapping;
use quick_xml::Reader;
use quick_xml::events::Event;
use quick_xml::name::QName;

/// Minimal element tree: name, concatenated text, child elements.
#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: QName<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(name.as_ref()).into_owned(),
            ..Default::default()
        }
    }

    /// The block itself when it is the root, otherwise a direct child.
    fn block(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find(|child| child.name == name)
    }
}

/// Flatten an XML document.
///
/// Leaf elements (no element children) contribute their trimmed text;
/// `<a/>` contributes an empty string. Attributes are ignored. Repeated
/// sibling names overwrite in document order.
pub fn flatten_xml(content: &str) -> Result<ConfigMapping, DocumentError> {
    let root = parse_tree(content)?;
    let flat = root.block(FLAT_BLOCK);
    let nested = root.block(NESTED_BLOCK);
    if flat.is_none() && nested.is_none() {
        return Err(DocumentError::UnrecognizedStructure);
    }

    let mut mapping = ConfigMapping::new();
    if let Some(block) = flat {
        for entry in &block.children {
            mapping.insert(entry.name.clone(), entry.text.clone());
        }
    }
    if let Some(block) = nested {
        for child in &block.children {
            flatten_element(child, "", &mut mapping);
        }
    }
    Ok(mapping)
}

fn flatten_element(element: &Element, prefix: &str, out: &mut ConfigMapping) {
    let key = join_key(prefix, &element.name);
    if element.children.is_empty() {
        out.insert(key, element.text.clone());
        return;
    }
    for child in &element.children {
        flatten_element(child, &key, out);
    }
}

fn parse_tree(content: &str) -> Result<Element, DocumentError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::new(start.name())),
            Event::Empty(empty) => attach(&mut stack, &mut root, Element::new(empty.name()))?,
            Event::End(_) => {
                // quick-xml rejects mismatched end tags before we get here
                let Some(element) = stack.pop() else {
                    return Err(DocumentError::UnrecognizedStructure);
                };
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&cdata));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(DocumentError::Unclosed(open.name));
    }
    root.ok_or(DocumentError::Empty)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(DocumentError::MultipleRoots),
        None => *root = Some(element),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_block_as_child_of_root() {
        let doc = r#"<?xml version="1.0"?>
<config>
  <keyValueProperties>
    <timeout>30</timeout>
    <name>  orders  </name>
  </keyValueProperties>
</config>"#;
        let mapping = flatten_xml(doc).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["timeout"], "30");
        assert_eq!(mapping["name"], "orders");
    }

    #[test]
    fn test_flat_block_as_root() {
        let doc = "<keyValueProperties><a>1</a><b/></keyValueProperties>";
        let mapping = flatten_xml(doc).unwrap();
        assert_eq!(mapping["a"], "1");
        assert_eq!(mapping["b"], "");
    }

    #[test]
    fn test_nested_block_joins_ancestor_names() {
        let doc = r#"
<config>
  <xmlStructure>
    <database>
      <primary><host>db1</host><port>5432</port></primary>
      <replica><host>db2</host></replica>
    </database>
    <debug>true</debug>
  </xmlStructure>
</config>"#;
        let mapping = flatten_xml(doc).unwrap();
        assert_eq!(mapping["database.primary.host"], "db1");
        assert_eq!(mapping["database.primary.port"], "5432");
        assert_eq!(mapping["database.replica.host"], "db2");
        assert_eq!(mapping["debug"], "true");
        assert_eq!(mapping.len(), 4);
    }

    #[test]
    fn test_both_blocks_contribute() {
        let doc = r#"
<config>
  <keyValueProperties><mode>fast</mode></keyValueProperties>
  <xmlStructure><cache><size>64</size></cache></xmlStructure>
</config>"#;
        let mapping = flatten_xml(doc).unwrap();
        assert_eq!(mapping["mode"], "fast");
        assert_eq!(mapping["cache.size"], "64");
    }

    #[test]
    fn test_entities_and_cdata() {
        let doc = "<keyValueProperties><q>a &amp; b</q><raw><![CDATA[<x>]]></raw></keyValueProperties>";
        let mapping = flatten_xml(doc).unwrap();
        assert_eq!(mapping["q"], "a & b");
        assert_eq!(mapping["raw"], "<x>");
    }

    #[test]
    fn test_repeated_siblings_last_wins() {
        let doc = "<xmlStructure><host>a</host><host>b</host></xmlStructure>";
        let mapping = flatten_xml(doc).unwrap();
        assert_eq!(mapping["host"], "b");
    }

    #[test]
    fn test_unrecognized_structure() {
        let err = flatten_xml("<config><other>1</other></config>").unwrap_err();
        assert!(matches!(err, DocumentError::UnrecognizedStructure));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(flatten_xml("").unwrap_err(), DocumentError::Empty));
        assert!(matches!(
            flatten_xml("<?xml version=\"1.0\"?>").unwrap_err(),
            DocumentError::Empty
        ));
    }

    #[test]
    fn test_unclosed_element() {
        assert!(flatten_xml("<keyValueProperties><a>1</a>").is_err());
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(flatten_xml("<keyValueProperties><a>1</b></keyValueProperties>").is_err());
    }

    #[test]
    fn test_multiple_roots() {
        let err = flatten_xml("<keyValueProperties/><keyValueProperties/>").unwrap_err();
        assert!(matches!(err, DocumentError::MultipleRoots));
    }
}
