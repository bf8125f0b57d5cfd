//! Output formatting for merged configuration.

use crate::types::{ConfigMapping, NamedConfigMapping};
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// Output format for rendered mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    /// `key=value` lines
    Properties,
}

/// Render any serializable value as JSON or YAML.
pub fn render_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::Json | OutputFormat::Properties => {
            Ok(serde_json::to_string_pretty(value)? + "\n")
        }
    }
}

/// Render a flat mapping.
pub fn render_flat(mapping: &ConfigMapping, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Properties => Ok(properties_lines(mapping)),
        other => render_structured(mapping, other),
    }
}

/// Render a named mapping. Properties output gets one `# name` header per file.
pub fn render_named(mapping: &NamedConfigMapping, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Properties => {
            let mut out = String::new();
            for (name, sub_map) in mapping {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&format!("# {name}\n"));
                out.push_str(&properties_lines(sub_map));
            }
            Ok(out)
        }
        other => render_structured(mapping, other),
    }
}

fn properties_lines(mapping: &ConfigMapping) -> String {
    let mut out = String::new();
    for (key, value) in mapping {
        out.push_str(&escape_property(key, true));
        out.push('=');
        out.push_str(&escape_property(value, false));
        out.push('\n');
    }
    out
}

/// Escape backslashes, line breaks and, in keys, `=`, `:` and spaces.
fn escape_property(text: &str, is_key: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '=' | ':' | ' ' if is_key => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped
}
