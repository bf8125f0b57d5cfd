//! Core types shared by the flatteners, the loader and the merge engine.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Flat configuration: dotted key path to string value.
///
/// A `BTreeMap` keeps iteration, logging and rendered output deterministic.
pub type ConfigMapping = BTreeMap<String, String>;

/// Per-file configuration keyed by the file's short name.
pub type NamedConfigMapping = BTreeMap<String, ConfigMapping>;

/// Separator used to join nested element or field names into one key.
pub const KEY_SEPARATOR: char = '.';

/// Source tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTier {
    /// `config/` directories under the code root (lowest priority)
    Default = 0,
    /// Files and URLs named by `CONFIG_URL*` properties
    Url = 1,
    /// Files in the directory named by `CONFIG_LOCATION`
    OverrideDirectory = 2,
    /// Literal `CONFIG_COMMAND_LINE*` properties (highest priority)
    CommandLine = 3,
}

impl SourceTier {
    /// Every tier in merge order.
    pub const ALL: [SourceTier; 4] = [
        SourceTier::Default,
        SourceTier::Url,
        SourceTier::OverrideDirectory,
        SourceTier::CommandLine,
    ];

    /// Whether this tier is made of documents rather than literal properties.
    pub fn is_file_backed(self) -> bool {
        !matches!(self, SourceTier::CommandLine)
    }
}

impl std::fmt::Display for SourceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTier::Default => write!(f, "default"),
            SourceTier::Url => write!(f, "url"),
            SourceTier::OverrideDirectory => write!(f, "override-directory"),
            SourceTier::CommandLine => write!(f, "command-line"),
        }
    }
}

/// Document format, chosen purely by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Xml,
    Json,
}

impl DocumentFormat {
    /// Match an extension (without the dot), ignoring ASCII case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xml" => Some(DocumentFormat::Xml),
            "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }

    /// Match the extension of a bare file name such as `app.json`.
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Match the extension of a filesystem path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Xml => write!(f, "xml"),
            DocumentFormat::Json => write!(f, "json"),
        }
    }
}

/// One enumerated configuration source, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDescriptor {
    pub tier: SourceTier,
    /// Path, URL or property key.
    pub location: String,
    /// Provenance name used by the named merge (None for properties).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order() {
        assert!(SourceTier::Default < SourceTier::Url);
        assert!(SourceTier::Url < SourceTier::OverrideDirectory);
        assert!(SourceTier::OverrideDirectory < SourceTier::CommandLine);

        let mut shuffled = vec![
            SourceTier::CommandLine,
            SourceTier::Default,
            SourceTier::OverrideDirectory,
            SourceTier::Url,
        ];
        shuffled.sort();
        assert_eq!(shuffled, SourceTier::ALL.to_vec());
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(DocumentFormat::from_name("a.xml"), Some(DocumentFormat::Xml));
        assert_eq!(DocumentFormat::from_name("a.JSON"), Some(DocumentFormat::Json));
        assert_eq!(DocumentFormat::from_name("a.txt"), None);
        assert_eq!(DocumentFormat::from_name("xml"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("/etc/app/config/db.Xml")),
            Some(DocumentFormat::Xml)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("/etc/app/README")), None);
    }
}
