//! Layered configuration loader.
//!
//! Discovers XML and JSON configuration documents across four tiers, flattens
//! each into string key-value pairs and merges them so that higher tiers win:
//!
//! 1. **Default** - every `config/` directory under the code root
//! 2. **Url** - files or URLs named by `CONFIG_URL*` properties
//! 3. **Override directory** - files in the `CONFIG_LOCATION` directory
//! 4. **Command line** - literal `CONFIG_COMMAND_LINE*` properties
//!
//! ```no_run
//! use layered_config::{ConfigLoader, ConfigSources};
//!
//! let loader = ConfigLoader::new(
//!     ConfigSources::discover().with_property("CONFIG_COMMAND_LINE.debug", "true"),
//! );
//! let flat = loader.load_flat();
//! let per_file = loader.load_named();
//! ```

pub mod cli;
pub mod error;
pub mod flatten;
pub mod format;
pub mod loader;
pub mod logging;
pub mod merge;
pub mod overrides;
pub mod sources;
pub mod types;

pub use error::{DocumentError, LoadError, LoadResult};
pub use loader::{Location, load_key_values, shorten_name, try_load_key_values};
pub use merge::{AppliedOverride, ConfigLoader, FlatMerge, NamedMerge};
pub use overrides::{OverrideRecord, apply_overrides, refine_overrides};
pub use sources::ConfigSources;
pub use types::{ConfigMapping, NamedConfigMapping, SourceTier};
