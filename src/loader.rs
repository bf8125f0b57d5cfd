//! Loading one configuration source into a [`ConfigMapping`].
//!
//! Dispatch is purely by extension: `.xml` and `.json` go to the matching
//! flattener, anything else contributes an empty mapping without being read.

use crate::error::{LoadError, LoadResult};
use crate::flatten::flatten;
use crate::types::{ConfigMapping, DocumentFormat};
use reqwest::StatusCode;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Timeout for fetching a remote document.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Local file (`file://` URLs are converted to paths)
    Path(PathBuf),
    /// `http` or `https` URL
    Remote(Url),
}

impl Location {
    /// Classify a location string. Anything that is not an `http(s)` or
    /// `file` URL is treated as a filesystem path.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Location::Remote(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Location::Path)
                .unwrap_or_else(|()| Location::Path(PathBuf::from(raw))),
            _ => Location::Path(PathBuf::from(raw)),
        }
    }

    /// Final path segment, used for provenance and format dispatch.
    pub fn name(&self) -> Option<String> {
        match self {
            Location::Path(path) => {
                let text = path.to_string_lossy();
                shorten_name(Some(&*text)).map(str::to_string)
            }
            Location::Remote(url) => shorten_name(Some(url.path())).map(str::to_string),
        }
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        self.name().as_deref().and_then(DocumentFormat::from_name)
    }

    /// Read the document text.
    pub fn read(&self) -> LoadResult<String> {
        match self {
            Location::Path(path) => {
                std::fs::read_to_string(path).map_err(|e| LoadError::io(path.display(), e))
            }
            Location::Remote(url) => fetch(url),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Path(path) => write!(f, "{}", path.display()),
            Location::Remote(url) => write!(f, "{url}"),
        }
    }
}

fn fetch(url: &Url) -> LoadResult<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| LoadError::fetch(url, e))?;

    let response = client
        .get(url.clone())
        .send()
        .map_err(|e| LoadError::fetch(url, e))?;
    if response.status() == StatusCode::NOT_FOUND {
        return Err(LoadError::MissingSource(url.to_string()));
    }
    response
        .error_for_status()
        .and_then(|response| response.text())
        .map_err(|e| LoadError::fetch(url, e))
}

/// Load one source, surfacing the reason it contributed nothing.
///
/// Blank locations and unsupported extensions succeed with an empty mapping.
pub fn try_load_key_values(location: &str) -> LoadResult<ConfigMapping> {
    let location = location.trim();
    if location.is_empty() {
        return Ok(ConfigMapping::new());
    }

    let source = Location::parse(location);
    let Some(format) = source.format() else {
        debug!(%location, "Unsupported extension, source ignored");
        return Ok(ConfigMapping::new());
    };

    let content = source.read()?;
    let mapping = flatten(format, &content).map_err(|e| LoadError::malformed(&source, e))?;
    debug!(%location, %format, keys = mapping.len(), "Loaded configuration source");
    Ok(mapping)
}

/// Load one source. Failures are logged and yield an empty mapping.
pub fn load_key_values(location: &str) -> ConfigMapping {
    match try_load_key_values(location) {
        Ok(mapping) => mapping,
        Err(err) if err.is_missing() => {
            warn!(%location, "Configuration source not found, skipping");
            ConfigMapping::new()
        }
        Err(err) => {
            warn!(%location, error = %err, "Configuration source could not be loaded, skipping");
            ConfigMapping::new()
        }
    }
}

/// Strip every leading path component (`/` or `\` separated).
///
/// Returns `None` for missing or empty input and for paths ending in a
/// separator.
pub fn shorten_name(path: Option<&str>) -> Option<&str> {
    let path = path.filter(|p| !p.is_empty())?;
    let name = path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path);
    (!name.is_empty()).then_some(name)
}

/// Provenance key of a location: its short name, or the location itself.
pub fn source_name(location: &str) -> String {
    Location::parse(location)
        .name()
        .unwrap_or_else(|| location.to_string())
}
