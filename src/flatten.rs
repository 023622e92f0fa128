//! # Flattened Documents
//!
//! Config and State are kept in memory as flat maps from dotted keys to leaf
//! values:
//!
//! ```yaml
//! # on disk
//! otlp:
//!   receiver:
//!     host: otel-collector
//!     port: 4317
//! ```
//!
//! becomes `{"otlp.receiver.host": "otel-collector", "otlp.receiver.port": 4317}`.
//!
//! ## Rules
//!
//! - Only mappings are descended into. Sequences, scalars, null and tagged
//!   values are copied through unchanged, so numbers stay numbers.
//! - An empty nested mapping produces no keys at all and does not survive a
//!   round trip.
//! - [`FlatMap`] is a `BTreeMap`, so iteration and [`to_document`] output are
//!   sorted lexicographically and persisted files diff cleanly between runs.
//! - Duplicate keys inside one document are rejected by the YAML parser
//!   before flattening sees them.

use std::collections::BTreeMap;
use std::path::Path;

use log::warn;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};
use crate::merge::yaml::{key_to_string, type_name};

/// A flattened document: dotted key to leaf value, sorted by key.
pub type FlatMap = BTreeMap<String, YamlValue>;

/// Flatten a nested mapping into dotted keys.
pub fn flatten(mapping: &Mapping) -> FlatMap {
    let mut out = FlatMap::new();
    flatten_into(mapping, "", &mut out);
    out
}

/// Flatten `value` as if it were stored at `key`.
///
/// A scalar produces the single entry `key`; a mapping produces one entry per
/// leaf below `key`.
pub fn flatten_at(key: &str, value: &YamlValue) -> FlatMap {
    let mut out = FlatMap::new();
    match value {
        YamlValue::Mapping(mapping) => flatten_into(mapping, key, &mut out),
        other => {
            out.insert(key.to_string(), other.clone());
        }
    }
    out
}

fn flatten_into(mapping: &Mapping, prefix: &str, out: &mut FlatMap) {
    for (key, value) in mapping {
        let key = key_to_string(key);
        let full_key = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            YamlValue::Mapping(child) => flatten_into(child, &full_key, out),
            leaf => {
                out.insert(full_key, leaf.clone());
            }
        }
    }
}

/// Rebuild a nested mapping from dotted keys.
///
/// Keys are split on every `.`. If one key is both a leaf and the parent of
/// other keys, the nested keys win and a warning is logged.
pub fn unflatten(flat: &FlatMap) -> Mapping {
    let mut root = Mapping::new();
    for (key, value) in flat {
        insert_dotted(&mut root, key, value.clone());
    }
    root
}

fn insert_dotted(root: &mut Mapping, key: &str, value: YamlValue) {
    let mut parts = key.split('.').peekable();
    let mut current = root;
    let mut walked = String::new();

    while let Some(part) = parts.next() {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(part);
        let slot_key = YamlValue::String(part.to_string());

        if parts.peek().is_none() {
            let has_children = matches!(
                current.get(&slot_key),
                Some(YamlValue::Mapping(existing)) if !existing.is_empty()
            );
            if has_children {
                warn!(
                    "Key '{}' is both a value and a parent of other keys; keeping the nested keys",
                    walked
                );
            } else {
                current.insert(slot_key, value);
            }
            return;
        }

        let slot = current
            .entry(slot_key)
            .or_insert(YamlValue::Mapping(Mapping::new()));
        if !slot.is_mapping() {
            warn!(
                "Key '{}' is both a {} and a parent of '{}'; keeping the nested keys",
                walked,
                type_name(slot),
                key
            );
            *slot = YamlValue::Mapping(Mapping::new());
        }
        let Some(next) = slot.as_mapping_mut() else {
            return;
        };
        current = next;
    }
}

/// Look up a dotted key in a flat map.
///
/// An exact key returns its leaf. Otherwise every entry below `key` is
/// gathered into a nested mapping, so `lookup(map, "otlp.receiver")` returns
/// `{host: ..., port: ...}`. Returns `None` if nothing lives at or below
/// `key`.
pub fn lookup(flat: &FlatMap, key: &str) -> Option<YamlValue> {
    if let Some(value) = flat.get(key) {
        return Some(value.clone());
    }
    let subtree = subtree(flat, key);
    if subtree.is_empty() {
        None
    } else {
        Some(YamlValue::Mapping(unflatten(&subtree)))
    }
}

/// Entries strictly below `key`, re-keyed relative to it.
fn subtree(flat: &FlatMap, key: &str) -> FlatMap {
    let prefix = format!("{}.", key);
    flat.range(prefix.clone()..)
        .take_while(|(k, _)| k.starts_with(&prefix))
        .map(|(k, v)| (k[prefix.len()..].to_string(), v.clone()))
        .collect()
}

/// Remove every entry that a write at `key` replaces: `key` itself, all
/// entries below it, and any ancestor leaf that would otherwise shadow it.
///
/// Returns the number of entries removed.
pub fn evict(flat: &mut FlatMap, key: &str) -> usize {
    let prefix = format!("{}.", key);
    let mut doomed: Vec<String> = flat
        .range(prefix.clone()..)
        .take_while(|(k, _)| k.starts_with(&prefix))
        .map(|(k, _)| k.clone())
        .collect();
    doomed.push(key.to_string());
    doomed.extend(
        key.match_indices('.')
            .map(|(idx, _)| key[..idx].to_string()),
    );

    let mut removed = 0;
    for key in &doomed {
        if flat.remove(key).is_some() {
            removed += 1;
        }
    }
    removed
}

/// Merge `overlay` over `base`; overlay values win on identical keys.
///
/// Only same-named keys are replaced. Base keys above or below an overlay
/// key pass through, so `a.b.c` in `base` survives `a.b` in `overlay`.
pub fn merge_flat(base: &mut FlatMap, overlay: &FlatMap) {
    for (key, value) in overlay {
        base.insert(key.clone(), value.clone());
    }
}

/// Parse a YAML document into a flat map.
///
/// An empty document is an empty map. `path` is only used to name the file
/// in errors.
///
/// # Errors
///
/// Returns `Error::Parse` if the document is malformed or its root is not a
/// mapping.
pub fn parse_document(contents: &str, path: &Path) -> Result<FlatMap> {
    if contents.trim().is_empty() {
        return Ok(FlatMap::new());
    }

    let document: YamlValue = serde_yaml::from_str(contents).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
        hint: None,
    })?;

    match document {
        YamlValue::Null => Ok(FlatMap::new()),
        YamlValue::Mapping(mapping) => Ok(flatten(&mapping)),
        other => Err(Error::Parse {
            path: path.to_path_buf(),
            message: format!("document root must be a mapping, found a {}", type_name(&other)),
            hint: Some("Write the document as 'key: value' pairs".to_string()),
        }),
    }
}

/// Serialize a flat map as a YAML document with sorted keys.
pub fn to_document(flat: &FlatMap) -> Result<String> {
    Ok(serde_yaml::to_string(flat)?)
}
