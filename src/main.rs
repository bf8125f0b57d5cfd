//! layered-config
//!
//! Prints the merged configuration for the current environment and flags.

use anyhow::Result;
use clap::Parser;
use layered_config::cli::get::run_get;
use layered_config::cli::report::{run_overrides, run_sources};
use layered_config::cli::{Cli, Command};
use layered_config::format::{render_flat, render_named};
use layered_config::logging::{self, LogTarget};
use layered_config::merge::ConfigLoader;
use std::io::Write;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), logging::default_level(cli.verbose))?;

    let sources = cli.sources();
    debug!(
        root = ?sources.code_root,
        properties = sources.properties.len(),
        "Configuration sources snapshot taken"
    );
    let loader = ConfigLoader::new(sources);

    let output = match &cli.command {
        Some(Command::Flat) | None => render_flat(&loader.load_flat(), cli.format)?,
        Some(Command::Named) => render_named(&loader.load_named(), cli.format)?,
        Some(Command::Get(args)) => run_get(&loader, args)? + "\n",
        Some(Command::Sources) => run_sources(&loader, cli.format)?,
        Some(Command::Overrides(args)) => run_overrides(&loader, args, cli.format)?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
