//! Tier-ordered merging of every configuration source.
//!
//! Tiers are always processed in the order
//! default → url → override-directory → command-line, so a higher tier wins
//! every key it shares with a lower one.
//!
//! - **Flat merge** unions everything into a single mapping.
//! - **Named merge** keeps one sub-map per source file, then refines every
//!   sub-map with the override-directory and command-line tiers in a second
//!   pass. Refining replaces existing keys only.

use crate::loader::{load_key_values, source_name};
use crate::overrides::{OverrideRecord, apply_overrides, refine_overrides};
use crate::sources::ConfigSources;
use crate::types::{ConfigMapping, NamedConfigMapping, SourceTier};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

/// An override together with where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedOverride {
    /// Tier whose value won
    pub tier: SourceTier,
    /// Sub-map the override was applied to (named merge only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(flatten)]
    pub record: OverrideRecord,
}

/// Result of a flat merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatMerge {
    pub mapping: ConfigMapping,
    pub overrides: Vec<AppliedOverride>,
}

/// Result of a named merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamedMerge {
    pub mapping: NamedConfigMapping,
    pub overrides: Vec<AppliedOverride>,
}

/// Configuration loader over one [`ConfigSources`] snapshot.
///
/// Every call re-reads its sources; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    sources: ConfigSources,
}

impl ConfigLoader {
    pub fn new(sources: ConfigSources) -> Self {
        Self { sources }
    }

    /// Loader over a snapshot of the process environment.
    pub fn discover() -> Self {
        Self::new(ConfigSources::discover())
    }

    pub fn sources(&self) -> &ConfigSources {
        &self.sources
    }

    /// Flat merge of all tiers.
    pub fn load_flat(&self) -> ConfigMapping {
        self.merge_flat().mapping
    }

    /// Named merge of all tiers.
    pub fn load_named(&self) -> NamedConfigMapping {
        self.merge_named().mapping
    }

    /// Flat merge, keeping every override that was applied.
    pub fn merge_flat(&self) -> FlatMerge {
        let mut merged = FlatMerge::default();

        // Default tier: plain union, later files win silently
        for location in self.sources.locations(SourceTier::Default) {
            merged.mapping.extend(load_key_values(&location));
        }

        for tier in [SourceTier::Url, SourceTier::OverrideDirectory] {
            let tier_mapping = self.load_tier(tier);
            let records = apply_overrides(&mut merged.mapping, &tier_mapping);
            merged.push_records(tier, records);
        }

        let command_line = self.sources.command_line_overrides();
        let records = apply_overrides(&mut merged.mapping, &command_line);
        merged.push_records(SourceTier::CommandLine, records);

        info!(
            keys = merged.mapping.len(),
            overrides = merged.overrides.len(),
            "Flat configuration merged"
        );
        merged
    }

    /// Named merge, keeping every override that was applied.
    pub fn merge_named(&self) -> NamedMerge {
        let mut merged = NamedMerge::default();
        let mut override_tier = ConfigMapping::new();

        // Pass 1: one sub-map per file
        for tier in [
            SourceTier::Default,
            SourceTier::Url,
            SourceTier::OverrideDirectory,
        ] {
            for location in self.sources.locations(tier) {
                let mapping = load_key_values(&location);
                if tier == SourceTier::OverrideDirectory {
                    override_tier.extend(mapping.clone());
                }
                let name = source_name(&location);
                if merged.mapping.insert(name.clone(), mapping).is_some() {
                    warn!(%name, %tier, %location, "Source name already loaded, replacing earlier file");
                }
            }
        }

        // Pass 2: refine every sub-map, override tier then command line
        let command_line = self.sources.command_line_overrides();
        for (tier, overrides) in [
            (SourceTier::OverrideDirectory, &override_tier),
            (SourceTier::CommandLine, &command_line),
        ] {
            if overrides.is_empty() {
                continue;
            }
            for (name, sub_map) in merged.mapping.iter_mut() {
                let _span = info_span!("refine", file = %name, %tier).entered();
                let records = refine_overrides(sub_map, overrides);
                merged.overrides.extend(records.into_iter().map(|record| AppliedOverride {
                    tier,
                    file: Some(name.clone()),
                    record,
                }));
            }
        }

        info!(
            files = merged.mapping.len(),
            overrides = merged.overrides.len(),
            "Named configuration merged"
        );
        merged
    }

    /// Union of every document in a tier, later files winning silently.
    fn load_tier(&self, tier: SourceTier) -> ConfigMapping {
        let mut mapping = ConfigMapping::new();
        for location in self.sources.locations(tier) {
            mapping.extend(load_key_values(&location));
        }
        debug!(%tier, keys = mapping.len(), "Tier loaded");
        mapping
    }
}

impl FlatMerge {
    fn push_records(&mut self, tier: SourceTier, records: Vec<OverrideRecord>) {
        self.overrides
            .extend(records.into_iter().map(|record| AppliedOverride {
                tier,
                file: None,
                record,
            }));
    }
}
