//! Env file rendering
//!
//! External deployment tooling receives state as a dotenv file: one
//! `KEY=value` line per flattened key, with the key upper-cased and every
//! `.` replaced by `_`, so `otlp.receiver.port` becomes `OTLP_RECEIVER_PORT`.

use std::fs;
use std::path::Path;

use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::flatten::FlatMap;
use crate::merge::yaml::compact_text;

/// The variable name for a dotted key.
pub fn env_key(key: &str) -> String {
    key.to_uppercase().replace('.', "_")
}

/// The text written after `=` for a value.
///
/// Strings are written verbatim, numbers and booleans by their text, and
/// null as nothing. Sequences and mappings are written as one-line text by
/// [`compact_text`].
pub fn env_value(value: &YamlValue) -> String {
    match value {
        YamlValue::Null => String::new(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::String(s) => s.clone(),
        YamlValue::Tagged(tagged) => env_value(&tagged.value),
        other => compact_text(other),
    }
}

/// Render every entry as a `KEY=value` line, in key order.
pub fn render(values: &FlatMap) -> String {
    values
        .iter()
        .map(|(key, value)| format!("{}={}\n", env_key(key), env_value(value)))
        .collect()
}

/// Render `values` and write them to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns `Error::Write` if the file cannot be written.
pub fn write(values: &FlatMap, path: &Path) -> Result<()> {
    fs::write(path, render(values)).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}
