//! Discovery of configuration sources.
//!
//! All discovery inputs live in a [`ConfigSources`] snapshot: the code root
//! searched for `config/` directories and a copy of the process properties.
//! Nothing here reads or writes the ambient environment after the snapshot is
//! taken.
//!
//! ## Properties
//! - `CONFIG_LOCATION` - directory holding override-tier files
//! - `CONFIG_URL*` - file paths or URLs for the url tier
//! - `CONFIG_COMMAND_LINE*` - literal key-value overrides
//! - `CONFIG_ROOT` - code root (default: directory of the running executable)

use crate::error::{LoadError, LoadResult};
use crate::loader::source_name;
use crate::types::{ConfigMapping, DocumentFormat, SourceDescriptor, SourceTier};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Property naming the override directory.
pub const CONFIG_LOCATION: &str = "CONFIG_LOCATION";

/// Prefix of properties naming url-tier sources.
pub const CONFIG_URL_PREFIX: &str = "CONFIG_URL";

/// Prefix of literal command-line override properties.
pub const CONFIG_COMMAND_LINE_PREFIX: &str = "CONFIG_COMMAND_LINE";

/// Environment variable overriding the code root.
pub const CONFIG_ROOT: &str = "CONFIG_ROOT";

/// Name of the default configuration directories.
pub const DEFAULT_DIR_NAME: &str = "config";

/// `config/` directories whose relative path contains this are skipped.
const EXCLUDED_PATH_FRAGMENT: &str = "test";

/// Snapshot of every input needed to discover configuration sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    /// Root searched for `config/` directories
    pub code_root: Option<PathBuf>,
    /// Property snapshot, ordered by key
    pub properties: BTreeMap<String, String>,
}

impl ConfigSources {
    /// Snapshot the process environment.
    ///
    /// The code root is `CONFIG_ROOT` if set, otherwise the directory holding
    /// the running executable. Variables that are not valid UTF-8 are skipped.
    pub fn discover() -> Self {
        let properties: BTreeMap<String, String> = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();

        let code_root = properties
            .get(CONFIG_ROOT)
            .filter(|root| !root.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_code_root);

        Self {
            code_root,
            properties,
        }
    }

    /// Create sources with an explicit code root and no properties.
    pub fn new(code_root: Option<PathBuf>) -> Self {
        Self {
            code_root,
            properties: BTreeMap::new(),
        }
    }

    /// Set the code root.
    pub fn with_code_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.code_root = Some(root.into());
        self
    }

    /// Add (or replace) one property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Add (or replace) several properties.
    pub fn with_properties<K, V>(mut self, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Look up one property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Properties whose key starts with `prefix`, in key order.
    fn prefixed<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a String, &'a String)> {
        self.properties
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
    }

    /// Every `.xml`/`.json` file below a `config/` directory under the code root.
    ///
    /// Directories whose path relative to the root contains `test` are
    /// skipped. Files are returned once each, sorted by path.
    pub fn default_files(&self) -> Vec<PathBuf> {
        let Some(root) = self.code_root.as_deref() else {
            debug!("No code root, default tier is empty");
            return Vec::new();
        };
        if !root.is_dir() {
            debug!(root = %root.display(), "Code root is not a directory");
            return Vec::new();
        }

        let mut files = BTreeSet::new();
        for entry in WalkDir::new(root).sort_by_file_name().into_iter().flatten() {
            if !entry.file_type().is_dir() || entry.file_name() != DEFAULT_DIR_NAME {
                continue;
            }
            if is_excluded(root, entry.path()) {
                debug!(dir = %entry.path().display(), "Skipping test config directory");
                continue;
            }
            debug!(dir = %entry.path().display(), "Found default config directory");
            files.extend(config_files_under(entry.path()));
        }
        files.into_iter().collect()
    }

    /// Values of every `CONFIG_URL*` property, in property-key order.
    pub fn url_sources(&self) -> Vec<String> {
        self.prefixed(CONFIG_URL_PREFIX)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Immediate `.xml`/`.json` files in the `CONFIG_LOCATION` directory.
    pub fn override_directory_files(&self) -> LoadResult<Vec<PathBuf>> {
        let location = self
            .property(CONFIG_LOCATION)
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .ok_or(LoadError::MissingDiscoveryProperty(CONFIG_LOCATION))?;

        let entries = std::fs::read_dir(location).map_err(|e| LoadError::io(location, e))?;
        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && DocumentFormat::from_path(path).is_some())
            .collect();
        files.sort();
        Ok(files)
    }

    /// Every `CONFIG_COMMAND_LINE*` property, keyed by the full property key.
    pub fn command_line_overrides(&self) -> ConfigMapping {
        self.prefixed(CONFIG_COMMAND_LINE_PREFIX)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Document locations of a file-backed tier, in merge order.
    ///
    /// A missing or unreadable override directory yields an empty list.
    pub fn locations(&self, tier: SourceTier) -> Vec<String> {
        match tier {
            SourceTier::Default => self
                .default_files()
                .iter()
                .map(|path| path_location(path))
                .collect(),
            SourceTier::Url => self.url_sources(),
            SourceTier::OverrideDirectory => match self.override_directory_files() {
                Ok(files) => files.iter().map(|path| path_location(path)).collect(),
                Err(err) => {
                    debug!(error = %err, "Override directory tier is empty");
                    Vec::new()
                }
            },
            SourceTier::CommandLine => Vec::new(),
        }
    }

    /// Every enumerated source across all tiers.
    pub fn describe(&self) -> Vec<SourceDescriptor> {
        let mut sources = Vec::new();
        for tier in SourceTier::ALL {
            if tier.is_file_backed() {
                sources.extend(self.locations(tier).into_iter().map(|location| {
                    SourceDescriptor {
                        tier,
                        name: Some(source_name(&location)),
                        location,
                    }
                }));
            } else {
                sources.extend(self.prefixed(CONFIG_COMMAND_LINE_PREFIX).map(|(key, _)| {
                    SourceDescriptor {
                        tier,
                        location: key.clone(),
                        name: None,
                    }
                }));
            }
        }
        sources
    }
}

/// Directory holding the running executable.
pub fn default_code_root() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()?
        .parent()
        .map(Path::to_path_buf)
}

fn is_excluded(root: &Path, dir: &Path) -> bool {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    relative.to_string_lossy().contains(EXCLUDED_PATH_FRAGMENT)
}

fn config_files_under(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| DocumentFormat::from_path(path).is_some())
}

fn path_location(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
