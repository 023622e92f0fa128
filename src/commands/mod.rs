//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `microbs` command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the [`Session`]
//!   built at start-up, and performs the command's logic.
//!
//! [`Session`]: microbs::session::Session

pub mod completions;
pub mod config;
pub mod context;
pub mod env;
pub mod state;

use anyhow::{bail, Result};
use serde_yaml::Value as YamlValue;

use microbs::flatten::{to_document, FlatMap};

/// Print a single value to stdout.
///
/// Strings print without quotes and scalars by their text, so the output can
/// be used directly in shell scripts. Mappings and sequences print as YAML,
/// or as pretty JSON with `json`.
pub(crate) fn print_value(value: &YamlValue, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
        return Ok(());
    }
    match value {
        YamlValue::String(s) => println!("{}", s),
        YamlValue::Number(n) => println!("{}", n),
        YamlValue::Bool(b) => println!("{}", b),
        YamlValue::Null => println!(),
        other => print!("{}", serde_yaml::to_string(other)?),
    }
    Ok(())
}

/// Print a whole store as a flat, sorted YAML document (or JSON object).
pub(crate) fn print_flat(values: &FlatMap, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(values)?);
    } else if !values.is_empty() {
        print!("{}", to_document(values)?);
    }
    Ok(())
}

/// Print the value found at `key`, or fail if nothing is stored there.
pub(crate) fn print_found(
    store: &str,
    key: &str,
    value: Option<YamlValue>,
    json: bool,
) -> Result<()> {
    match value {
        Some(value) => print_value(&value, json),
        None => bail!("Key '{}' is not set in {}", key, store),
    }
}

/// Parse a value given on the command line.
///
/// Scalars keep their YAML type, so `4317` is a number and `true` a boolean.
/// Anything that is not a plain scalar is kept as the literal string.
pub(crate) fn parse_scalar(raw: &str) -> YamlValue {
    if raw.trim().is_empty() {
        return YamlValue::from(raw);
    }
    match serde_yaml::from_str::<YamlValue>(raw) {
        Ok(YamlValue::Mapping(_) | YamlValue::Sequence(_) | YamlValue::Tagged(_)) | Err(_) => {
            YamlValue::from(raw)
        }
        Ok(value) => value,
    }
}
