//! # Config Store
//!
//! The config store holds the operator's declared intent for the current run
//! (`deployment.name`, `docker.registry`, ...). It is read from exactly one
//! `config.yaml`, flattened to dotted keys, and then frozen.
//!
//! ## One-shot latch
//!
//! The first call to [`ConfigStore::init`], or the first read through
//! [`ConfigStore::get`] or [`ConfigStore::all`], loads the file. Every later
//! `init` returns the values already loaded, whatever path it is given.
//! Config is a fixed fact for the whole command: if a later caller could
//! reload from a different file, values already read and acted on would
//! silently change underneath them.
//!
//! ## Missing files
//!
//! If no config file can be resolved at all, the store loads as empty and a
//! warning is logged. A path that *was* resolved but does not exist is an
//! error, since the operator pointed at it.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_yaml::Value as YamlValue;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::flatten::{lookup, parse_document, FlatMap};
use crate::path::{resolve, StoreKind};

/// Immutable, lazily loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    values: FlatMap,
    initialized: bool,
    source: Option<PathBuf>,
}

impl ConfigStore {
    /// Create a store that loads on first access.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that is already frozen with `values`.
    pub fn from_map(values: FlatMap) -> Self {
        Self {
            values,
            initialized: true,
            source: None,
        }
    }

    /// Read, parse and flatten the config file without touching any store.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the resolved file does not exist.
    /// - `Error::Read` if it cannot be read.
    /// - `Error::Parse` if it is not a valid YAML mapping.
    pub fn load(context: &Context, path: Option<&Path>) -> Result<FlatMap> {
        Self::load_resolved(resolve(context, StoreKind::Config, path).as_deref())
    }

    fn load_resolved(path: Option<&Path>) -> Result<FlatMap> {
        let Some(path) = path else {
            warn!("No config file found; continuing with an empty config");
            return Ok(FlatMap::new());
        };
        if !path.exists() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_document(&contents, path)
    }

    /// Load the config once and freeze it.
    ///
    /// Later calls return the frozen values and ignore `path`. A failed load
    /// leaves the store uninitialized.
    pub fn init(&mut self, context: &Context, path: Option<&Path>) -> Result<&FlatMap> {
        if self.initialized {
            if let Some(path) = path {
                debug!(
                    "Config already loaded; ignoring request to load {}",
                    path.display()
                );
            }
            return Ok(&self.values);
        }

        let resolved = resolve(context, StoreKind::Config, path);
        let values = Self::load_resolved(resolved.as_deref())?;
        debug!(
            "Loaded {} config value(s) from {}",
            values.len(),
            resolved
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".to_string())
        );

        self.values = values;
        self.source = resolved;
        self.initialized = true;
        Ok(&self.values)
    }

    /// The value at a dotted key, loading the config first if needed.
    ///
    /// A key that is a prefix of other keys returns them as a nested mapping.
    pub fn get(&mut self, context: &Context, key: &str) -> Result<Option<YamlValue>> {
        let values = self.init(context, None)?;
        Ok(lookup(values, key))
    }

    /// Every config value, loading the config first if needed.
    pub fn all(&mut self, context: &Context) -> Result<&FlatMap> {
        self.init(context, None)
    }

    /// Whether every key in `keys` has a set value, loading the config first
    /// if needed.
    ///
    /// A key counts as unset when it is absent or holds `null`, `false`, an
    /// empty string, or zero. An empty `keys` list is trivially satisfied.
    pub fn has_all(&mut self, context: &Context, keys: &[&str]) -> Result<bool> {
        let values = self.init(context, None)?;
        Ok(keys
            .iter()
            .all(|key| lookup(values, key).is_some_and(|value| is_set(&value))))
    }

    /// Whether the config has been loaded and frozen.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The file the config was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn is_set(value: &YamlValue) -> bool {
    match value {
        YamlValue::Null => false,
        YamlValue::Bool(b) => *b,
        YamlValue::String(s) => !s.is_empty(),
        YamlValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        YamlValue::Tagged(tagged) => is_set(&tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => true,
    }
}
