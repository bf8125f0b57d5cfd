//! Override resolution between two mappings.
//!
//! Two flavours:
//! - [`apply_overrides`] sets every overriding key, replacing or inserting
//! - [`refine_overrides`] only replaces keys the target already declares,
//!   so an override never injects a key into a mapping that did not own it

use crate::types::ConfigMapping;
use serde::Serialize;
use tracing::info;

/// One value replaced by an override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideRecord {
    pub key: String,
    pub previous: String,
    pub value: String,
}

/// Apply every key of `overrides` onto `target`.
///
/// Keys already present in `target` are logged and returned as records.
pub fn apply_overrides(target: &mut ConfigMapping, overrides: &ConfigMapping) -> Vec<OverrideRecord> {
    let mut records = Vec::new();
    for (key, value) in overrides {
        if let Some(previous) = target.insert(key.clone(), value.clone()) {
            records.push(record(key, previous, value));
        }
    }
    records
}

/// Apply only the keys of `overrides` that `target` already declares.
///
/// Keys whose value is already the overriding one are left alone and not
/// recorded.
pub fn refine_overrides(target: &mut ConfigMapping, overrides: &ConfigMapping) -> Vec<OverrideRecord> {
    let mut records = Vec::new();
    for (key, value) in overrides {
        match target.get_mut(key) {
            Some(slot) if slot != value => {
                let previous = std::mem::replace(slot, value.clone());
                records.push(record(key, previous, value));
            }
            _ => {}
        }
    }
    records
}

fn record(key: &str, previous: String, value: &str) -> OverrideRecord {
    info!(key, old = %previous, new = %value, "Overriding configuration value");
    OverrideRecord {
        key: key.to_string(),
        previous,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> ConfigMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_apply_sets_every_key() {
        let mut target = mapping(&[("x", "1"), ("y", "2")]);
        let overrides = mapping(&[("x", "9"), ("z", "3")]);

        let records = apply_overrides(&mut target, &overrides);

        assert_eq!(target, mapping(&[("x", "9"), ("y", "2"), ("z", "3")]));
        // Only the collision is recorded; z was a plain insert
        assert_eq!(
            records,
            vec![OverrideRecord {
                key: "x".into(),
                previous: "1".into(),
                value: "9".into(),
            }]
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let overrides = mapping(&[("a", "new"), ("b", "added")]);

        let mut once = mapping(&[("a", "old"), ("c", "kept")]);
        apply_overrides(&mut once, &overrides);

        let mut twice = once.clone();
        apply_overrides(&mut twice, &overrides);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_apply_leaves_other_keys_unchanged() {
        let mut target = mapping(&[("keep", "1"), ("swap", "2")]);
        apply_overrides(&mut target, &mapping(&[("swap", "3")]));
        assert_eq!(target["keep"], "1");
        assert_eq!(target["swap"], "3");
    }

    #[test]
    fn test_apply_empty_overrides() {
        let mut target = mapping(&[("a", "1")]);
        assert!(apply_overrides(&mut target, &ConfigMapping::new()).is_empty());
        assert_eq!(target, mapping(&[("a", "1")]));
    }

    #[test]
    fn test_refine_never_injects() {
        let mut target = mapping(&[("x", "1"), ("y", "2")]);
        let overrides = mapping(&[("x", "9"), ("z", "3")]);

        let records = refine_overrides(&mut target, &overrides);

        assert_eq!(target, mapping(&[("x", "9"), ("y", "2")]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].previous, "1");
    }

    #[test]
    fn test_refine_skips_unchanged_values() {
        let mut target = mapping(&[("x", "9"), ("y", "1")]);
        let records = refine_overrides(&mut target, &mapping(&[("x", "9"), ("y", "2")]));
        assert_eq!(target, mapping(&[("x", "9"), ("y", "2")]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "y");
    }

    #[test]
    fn test_same_value_is_still_recorded() {
        let mut target = mapping(&[("x", "1")]);
        let records = apply_overrides(&mut target, &mapping(&[("x", "1")]));
        assert_eq!(records.len(), 1);
        assert_eq!(target["x"], "1");
    }
}
