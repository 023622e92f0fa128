//! # State Store
//!
//! State holds durable deployment facts that outlive a single command, such
//! as the ID of a resource provisioned by an earlier run. Unlike config it is
//! mutable: values can be set, removed and saved back to `state.yaml`.
//!
//! ## Loading
//!
//! Loading reads the state file and then merges the config over it. When
//! both define the same key the config value wins. Every other state key
//! passes through, including keys nested above or below a config key.
//!
//! A fresh environment with no state file gets an empty one created on
//! first read, under `~/.microbs` unless a location was registered in the
//! context.
//!
//! ## Persistence
//!
//! [`StateStore::save`] always writes the flattened form with sorted keys,
//! however the file was laid out when it was read. Write failures are
//! returned to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_yaml::Value as YamlValue;

use crate::config::ConfigStore;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::flatten::{evict, flatten_at, lookup, merge_flat, parse_document, to_document, FlatMap};
use crate::path::{default_location, resolve, StoreKind};

/// Mutable, persistable deployment facts.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    values: FlatMap,
    initialized: bool,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The file backing the state store: the resolved path, or the default
    /// location under the user directory.
    pub fn location(context: &Context, path: Option<&Path>) -> PathBuf {
        resolve(context, StoreKind::State, path)
            .unwrap_or_else(|| default_location(context, StoreKind::State))
    }

    /// Read the raw state document, creating an empty file if none exists.
    ///
    /// # Errors
    ///
    /// Returns `Error::Write` if the missing file cannot be created and
    /// `Error::Read` if the file cannot be read.
    pub fn read(context: &Context, path: Option<&Path>) -> Result<String> {
        let path = Self::location(context, path);

        if !path.exists() {
            info!("Creating empty state file at {}", path.display());
            create_parent(&path)?;
            fs::write(&path, "").map_err(|source| Error::Write {
                path: path.clone(),
                source,
            })?;
            return Ok(String::new());
        }

        fs::read_to_string(&path).map_err(|source| Error::Read { path, source })
    }

    /// Read and flatten the state file, then merge the config over it.
    ///
    /// Does not modify this store. Initializes `config` if it was not
    /// loaded yet.
    pub fn load(
        context: &Context,
        config: &mut ConfigStore,
        path: Option<&Path>,
    ) -> Result<FlatMap> {
        let location = Self::location(context, path);
        let contents = Self::read(context, Some(&location))?;
        let mut values = parse_document(&contents, &location)?;
        merge_flat(&mut values, config.all(context)?);
        Ok(values)
    }

    /// Discard the in-memory state and reload it from disk.
    ///
    /// Unsaved changes are lost. On failure the store keeps its previous
    /// contents.
    pub fn init(
        &mut self,
        context: &Context,
        config: &mut ConfigStore,
        path: Option<&Path>,
    ) -> Result<&FlatMap> {
        let values = Self::load(context, config, path)?;
        debug!("Loaded {} state value(s)", values.len());
        self.values = values;
        self.initialized = true;
        Ok(&self.values)
    }

    fn ensure_initialized(&mut self, context: &Context, config: &mut ConfigStore) -> Result<()> {
        if !self.initialized {
            debug!("State not loaded yet; loading on first access");
            self.init(context, config, None)?;
        }
        Ok(())
    }

    /// The value at a dotted key, loading state first if needed.
    pub fn get(
        &mut self,
        context: &Context,
        config: &mut ConfigStore,
        key: &str,
    ) -> Result<Option<YamlValue>> {
        self.ensure_initialized(context, config)?;
        Ok(lookup(&self.values, key))
    }

    /// Every state value, loading state first if needed.
    pub fn all(&mut self, context: &Context, config: &mut ConfigStore) -> Result<&FlatMap> {
        self.ensure_initialized(context, config)?;
        Ok(&self.values)
    }

    /// Write `value` at `key`, loading state first if needed.
    ///
    /// A mapping is flattened below `key`. Whatever the write shadows is
    /// removed first: the old value, any keys nested below `key`, and any
    /// ancestor leaf. `None` only removes.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKey` for an empty key.
    pub fn set(
        &mut self,
        context: &Context,
        config: &mut ConfigStore,
        key: &str,
        value: impl Into<Option<YamlValue>>,
    ) -> Result<()> {
        if key.is_empty() {
            return Err(Error::InvalidKey {
                key: key.to_string(),
                message: "state keys must not be empty".to_string(),
            });
        }
        self.ensure_initialized(context, config)?;

        let removed = evict(&mut self.values, key);
        match value.into() {
            Some(value) => {
                self.values.extend(flatten_at(key, &value));
                debug!("Set state key '{}' (replaced {} entries)", key, removed);
            }
            None => debug!("Removed state key '{}' ({} entries)", key, removed),
        }
        Ok(())
    }

    /// Remove `key` and everything below it.
    pub fn remove(&mut self, context: &Context, config: &mut ConfigStore, key: &str) -> Result<()> {
        self.set(context, config, key, None)
    }

    /// Persist the in-memory state and return the path written.
    ///
    /// # Errors
    ///
    /// Returns `Error::Write` if the directory or file cannot be written.
    pub fn save(
        &mut self,
        context: &Context,
        config: &mut ConfigStore,
        path: Option<&Path>,
    ) -> Result<PathBuf> {
        self.ensure_initialized(context, config)?;

        let path = Self::location(context, path);
        let document = to_document(&self.values)?;
        create_parent(&path)?;
        fs::write(&path, document).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;

        debug!("Saved {} state value(s) to {}", self.values.len(), path.display());
        Ok(path)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| Error::Write {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
