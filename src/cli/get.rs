//! `get` subcommand: print one merged value.

use crate::merge::ConfigLoader;
use anyhow::{Result, bail};
use clap::Args;

/// Arguments for the get subcommand
#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    /// Key to look up, e.g. `database.primary.host`
    pub key: String,

    /// Look the key up in one file's sub-map of the named merge
    #[arg(long, value_name = "NAME")]
    pub file: Option<String>,
}

/// Resolve the requested value. Missing keys and files are errors.
pub fn run_get(loader: &ConfigLoader, args: &GetArgs) -> Result<String> {
    let value = match &args.file {
        Some(file) => {
            let named = loader.load_named();
            let Some(sub_map) = named.get(file) else {
                bail!("no configuration file named '{}'", file);
            };
            sub_map.get(&args.key).cloned()
        }
        None => loader.load_flat().remove(&args.key),
    };

    match value {
        Some(value) => Ok(value),
        None => bail!("key '{}' not found", args.key),
    }
}
