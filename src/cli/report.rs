//! `sources` and `overrides` subcommands: diagnostics about a merge.

use crate::format::{OutputFormat, render_structured};
use crate::merge::{AppliedOverride, ConfigLoader};
use crate::types::SourceDescriptor;
use anyhow::Result;
use clap::Args;

/// Arguments for the overrides subcommand
#[derive(Args, Debug, Clone)]
pub struct OverridesArgs {
    /// Report overrides of the named merge instead of the flat merge
    #[arg(long)]
    pub named: bool,
}

/// Render the enumerated sources of every tier.
pub fn run_sources(loader: &ConfigLoader, format: OutputFormat) -> Result<String> {
    let sources = loader.sources().describe();
    match format {
        OutputFormat::Properties => Ok(sources.iter().map(source_line).collect()),
        other => render_structured(&sources, other),
    }
}

/// Render every override applied during the selected merge.
pub fn run_overrides(
    loader: &ConfigLoader,
    args: &OverridesArgs,
    format: OutputFormat,
) -> Result<String> {
    let overrides = if args.named {
        loader.merge_named().overrides
    } else {
        loader.merge_flat().overrides
    };
    match format {
        OutputFormat::Properties => Ok(overrides.iter().map(override_line).collect()),
        other => render_structured(&overrides, other),
    }
}

fn source_line(source: &SourceDescriptor) -> String {
    format!("{}={}\n", source.tier, source.location)
}

fn override_line(applied: &AppliedOverride) -> String {
    let record = &applied.record;
    match &applied.file {
        Some(file) => format!(
            "[{}] {}: {} = {} (was {})\n",
            applied.tier, file, record.key, record.value, record.previous
        ),
        None => format!(
            "[{}] {} = {} (was {})\n",
            applied.tier, record.key, record.value, record.previous
        ),
    }
}
