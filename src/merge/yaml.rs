//! Navigation and deep merging of nested YAML values
//!
//! The Context keeps its facts as a nested tree, so it needs to read a value
//! at a key path, create intermediate structure when writing a new key, and
//! merge caller overrides over the default skeleton. These helpers do that
//! for any `serde_yaml::Value`.

use log::{debug, warn};
use serde_yaml::{Mapping, Value};

use super::{join_path, PathSegment};
use crate::error::{Error, Result};

/// The largest sequence index a write may create. Writing further out would
/// pad the sequence with that many nulls.
pub const MAX_SEQUENCE_INDEX: usize = 4096;

/// Render a mapping key as the text used in dotted paths.
///
/// Strings are used verbatim and numbers and booleans by their scalar text,
/// so `ports: {8080: web}` flattens to `ports.8080`. Structured keys fall
/// back to [`compact_text`].
pub fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => compact_text(other),
    }
}

/// One-line text for a structured value: compact JSON when it has a JSON
/// form, otherwise YAML flow style.
///
/// Mappings with keys JSON cannot represent (null, sequences, mappings) have
/// no JSON form.
pub fn compact_text(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!(
            "Cannot render {} as JSON ({}); using YAML flow style",
            type_name(value),
            e
        );
        flow_text(value)
    })
}

fn flow_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(seq) => {
            let items: Vec<String> = seq.iter().map(flow_text).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", flow_text(k), flow_text(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, flow_text(&tagged.value)),
    }
}

/// A short human-readable name for the kind of a value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Look up the value at `path`, if every segment exists.
///
/// An empty path returns the root itself.
pub fn get_path<'a>(value: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Mapping(map)) => map.get(key.as_str())?,
            (PathSegment::Index(idx), Value::Sequence(seq)) => seq.get(*idx)?,
            (PathSegment::Index(idx), Value::Mapping(map)) => map.get(idx.to_string().as_str())?,
            _ => return None,
        };
    }
    Some(current)
}

/// Find the deepest existing ancestor of `path` that is not a container.
///
/// Writing `path` would have to replace such an ancestor, so callers that
/// must not overwrite existing values use this to refuse the write. Returns
/// the ancestor's path and value.
pub fn blocking_ancestor<'a>(
    value: &'a Value,
    path: &[PathSegment],
) -> Option<(String, &'a Value)> {
    let mut current = value;
    for (depth, segment) in path.iter().enumerate().take(path.len().saturating_sub(1)) {
        let child = match (segment, current) {
            (PathSegment::Key(key), Value::Mapping(map)) => map.get(key.as_str()),
            (PathSegment::Index(idx), Value::Sequence(seq)) => seq.get(*idx),
            (PathSegment::Index(idx), Value::Mapping(map)) => map.get(idx.to_string().as_str()),
            _ => None,
        };
        match child {
            None => return None,
            Some(child @ (Value::Mapping(_) | Value::Sequence(_))) => current = child,
            Some(child) => return Some((join_path(&path[..=depth]), child)),
        }
    }
    None
}

/// Navigate to `path` within a YAML value, creating intermediate structures
/// as needed.
///
/// Missing keys are created as null, and a null slot becomes a mapping or a
/// sequence depending on the next segment. Sequences are padded with nulls up
/// to the requested index.
///
/// # Errors
///
/// Returns `Error::InvalidKey` if a segment would have to descend into a
/// scalar, or if an index is above [`MAX_SEQUENCE_INDEX`].
pub fn navigate_mut<'a>(value: &'a mut Value, path: &[PathSegment]) -> Result<&'a mut Value> {
    // Checked before anything is created, so a rejected path leaves no trace.
    for segment in path {
        if let PathSegment::Index(idx) = segment {
            if *idx > MAX_SEQUENCE_INDEX {
                return Err(Error::InvalidKey {
                    key: join_path(path),
                    message: format!(
                        "sequence index {} exceeds the limit of {}",
                        idx, MAX_SEQUENCE_INDEX
                    ),
                });
            }
        }
    }

    let mut current = value;
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if current.is_null() {
                    *current = Value::Mapping(Mapping::new());
                }
                let found = type_name(current);
                let map = current.as_mapping_mut().ok_or_else(|| Error::InvalidKey {
                    key: join_path(path),
                    message: format!("expected a mapping at '{}', found a {}", key, found),
                })?;
                current = map.entry(Value::String(key.clone())).or_insert(Value::Null);
            }
            PathSegment::Index(idx) => {
                if current.is_null() {
                    *current = Value::Sequence(Vec::new());
                }
                let found = type_name(current);
                let seq = current.as_sequence_mut().ok_or_else(|| Error::InvalidKey {
                    key: join_path(path),
                    message: format!("expected a sequence at index {}, found a {}", idx, found),
                })?;
                if seq.len() <= *idx {
                    seq.resize(*idx + 1, Value::Null);
                }
                current = &mut seq[*idx];
            }
        }
    }
    Ok(current)
}

/// Recursively merge `source` into `target`.
///
/// Mappings merge key by key; for anything else the source replaces the
/// target. `path` is only used for logging.
pub fn deep_merge(target: &mut Value, source: &Value, path: &str) {
    match (target, source) {
        (Value::Mapping(target_map), Value::Mapping(source_map)) => {
            for (key, value) in source_map {
                let key_str = key_to_string(key);
                let child_path = if path.is_empty() {
                    key_str
                } else {
                    format!("{}.{}", path, key_str)
                };
                match target_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value, &child_path),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, source) => {
            if *target != *source {
                debug!(
                    "Overriding {} at '{}' with {}",
                    type_name(target),
                    path,
                    type_name(source)
                );
            }
            *target = source.clone();
        }
    }
}

/// Collect every leaf of a value together with its path.
///
/// Non-empty mappings are descended into; everything else, including
/// sequences and empty mappings below the root, is a leaf.
pub fn leaves(value: &Value) -> Vec<(Vec<PathSegment>, Value)> {
    let mut out = Vec::new();
    collect_leaves(value, &mut Vec::new(), &mut out);
    out
}

fn collect_leaves(
    value: &Value,
    prefix: &mut Vec<PathSegment>,
    out: &mut Vec<(Vec<PathSegment>, Value)>,
) {
    match value {
        Value::Mapping(map) if !map.is_empty() || prefix.is_empty() => {
            for (key, child) in map {
                prefix.push(PathSegment::Key(key_to_string(key)));
                collect_leaves(child, prefix, out);
                prefix.pop();
            }
        }
        _ => out.push((prefix.clone(), value.clone())),
    }
}
