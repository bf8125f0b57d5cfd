//! CLI command definitions for layered-config
//!
//! This module defines the CLI structure using clap's derive macros.
//! Global flags build the [`ConfigSources`] snapshot; subcommands pick what
//! to print from it.

pub mod get;
pub mod report;

use crate::format::OutputFormat;
use crate::sources::{
    CONFIG_LOCATION, CONFIG_URL_PREFIX, ConfigSources, default_code_root,
};
use clap::{Parser, Subcommand};
use get::GetArgs;
use report::OverridesArgs;
use std::path::PathBuf;

/// Layered XML/JSON configuration loader
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Code root searched for `config/` directories (default: $CONFIG_ROOT,
    /// then the executable's directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Override directory (sets CONFIG_LOCATION)
    #[arg(long, global = true, value_name = "DIR")]
    pub location: Option<String>,

    /// Extra url-tier source, file path or URL (repeatable)
    #[arg(long = "url", global = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Raw property, e.g. -D CONFIG_COMMAND_LINE.db.host=localhost (repeatable)
    #[arg(
        short = 'D',
        long = "define",
        global = true,
        value_name = "KEY=VALUE",
        value_parser = parse_define
    )]
    pub defines: Vec<(String, String)>,

    /// Ignore the process environment; only flags provide properties
    #[arg(long, global = true)]
    pub no_env: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the flat merged mapping (default if no subcommand given)
    Flat,

    /// Print the per-file merged mapping
    Named,

    /// Print a single value
    Get(GetArgs),

    /// List enumerated sources per tier
    Sources,

    /// List every override applied during a merge
    Overrides(OverridesArgs),
}

impl Cli {
    /// Build the source snapshot from the environment and flags.
    ///
    /// Flags are applied after the environment, so they win on conflicts.
    pub fn sources(&self) -> ConfigSources {
        let mut sources = if self.no_env {
            ConfigSources::new(default_code_root())
        } else {
            ConfigSources::discover()
        };

        if let Some(root) = &self.root {
            sources = sources.with_code_root(root);
        }
        if let Some(location) = &self.location {
            sources = sources.with_property(CONFIG_LOCATION, location);
        }
        for (index, url) in self.urls.iter().enumerate() {
            sources = sources.with_property(flag_url_key(index), url);
        }
        sources.with_properties(self.defines.iter().cloned())
    }
}

/// Property key for the `index`-th `--url` flag.
///
/// `~` sorts after every character of an environment variable name, so flag
/// URLs load after (and win over) `CONFIG_URL*` variables.
fn flag_url_key(index: usize) -> String {
    format!("{CONFIG_URL_PREFIX}~flag{index:03}")
}

/// Parse a `KEY=VALUE` pair. The value may itself contain `=`.
fn parse_define(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
