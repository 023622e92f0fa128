//! # Invocation Context
//!
//! The context records facts about the current command invocation: which
//! command runs, its arguments, the log level, and where the config and state
//! files live. Paths resolved here are what [`crate::path::resolve`] consults
//! before looking at the filesystem.
//!
//! ## Write-once keys
//!
//! A key can be set exactly once. A second `set` of the same key returns
//! `Ok(false)` and leaves the first value in place, so code running later in
//! the command cannot quietly change a fact that earlier code already acted
//! on. The same goes for writes that would have to replace an existing scalar
//! to create nested keys below it.
//!
//! Writing an absent value (`None`) is a programmer error and fails with
//! [`Error::AbsentValue`]. `Value::Null` is an ordinary value.
//!
//! ## Lifecycle
//!
//! 1. [`Context::init`] lays the default skeleton and the caller's overrides
//!    into the store.
//! 2. New keys may still be added with [`Context::set`].
//! 3. [`Context::freeze`] closes the store. After that `init` is a no-op and
//!    every `set` returns `Ok(false)`.
//!
//! Reads always hand out owned copies, never references into the store.

use std::path::PathBuf;

use log::{debug, warn};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::defaults::{self, DEFAULT_LOG_LEVEL};
use crate::error::{Error, Result};
use crate::merge::yaml::{blocking_ancestor, deep_merge, get_path, leaves, navigate_mut, type_name};
use crate::merge::{join_path, parse_path, PathSegment};
use crate::path::StoreKind;

/// Write-once store of invocation facts.
#[derive(Debug, Clone)]
pub struct Context {
    data: YamlValue,
    frozen: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create an empty, unfrozen context.
    pub fn new() -> Self {
        Self {
            data: YamlValue::Mapping(Mapping::new()),
            frozen: false,
        }
    }

    /// Create a context from the default skeleton overlaid with `overrides`.
    pub fn with_defaults(overrides: Mapping) -> Self {
        let mut context = Self::new();
        context.init(overrides);
        context
    }

    /// Register the default skeleton merged with `overrides`.
    ///
    /// Overrides win over skeleton defaults, but keys that are already present
    /// in the context keep their value. Once the context is frozen this does
    /// nothing and returns the existing context unchanged.
    pub fn init(&mut self, overrides: Mapping) -> &Self {
        if self.frozen {
            debug!(
                "Context is frozen; ignoring {} override(s)",
                overrides.len()
            );
            return self;
        }

        let mut merged = YamlValue::Mapping(defaults::context_skeleton());
        deep_merge(&mut merged, &YamlValue::Mapping(overrides), "");

        for (path, value) in leaves(&merged) {
            let key = join_path(&path);
            match self.insert(&path, &key, value) {
                Ok(true) => {}
                Ok(false) => debug!("Context key '{}' kept its existing value", key),
                Err(e) => warn!("Skipping context key '{}': {}", key, e),
            }
        }
        self
    }

    /// Set `key` to `value` unless the key already exists.
    ///
    /// Returns `Ok(true)` when the value was stored and `Ok(false)` when the
    /// key was already present, an ancestor already holds a scalar, or the
    /// context is frozen.
    ///
    /// # Errors
    ///
    /// - `Error::AbsentValue` if `value` is `None`.
    /// - `Error::InvalidKey` if `key` is empty or cannot address a value.
    pub fn set(&mut self, key: &str, value: impl Into<Option<YamlValue>>) -> Result<bool> {
        let Some(value) = value.into() else {
            return Err(Error::AbsentValue {
                key: key.to_string(),
            });
        };

        let path = parse_path(key);
        if path.is_empty() {
            return Err(Error::InvalidKey {
                key: key.to_string(),
                message: "context keys must not be empty".to_string(),
            });
        }

        self.insert(&path, key, value)
    }

    fn insert(&mut self, path: &[PathSegment], key: &str, value: YamlValue) -> Result<bool> {
        if self.frozen {
            debug!("Context is frozen; not setting '{}'", key);
            return Ok(false);
        }

        if get_path(&self.data, path).is_some() {
            debug!("Context key '{}' is already set", key);
            return Ok(false);
        }

        if let Some((ancestor, existing)) = blocking_ancestor(&self.data, path) {
            warn!(
                "Cannot set context key '{}': '{}' already holds a {}",
                key,
                ancestor,
                type_name(existing)
            );
            return Ok(false);
        }

        *navigate_mut(&mut self.data, path)? = value;
        Ok(true)
    }

    /// A copy of the value at `key`. The empty key returns the whole store.
    pub fn get(&self, key: &str) -> Option<YamlValue> {
        get_path(&self.data, &parse_path(key)).cloned()
    }

    /// The string at `key`, if the key holds a string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        get_path(&self.data, &parse_path(key))
            .and_then(YamlValue::as_str)
            .map(str::to_owned)
    }

    /// Whether anything is stored at `key`, including null.
    pub fn contains(&self, key: &str) -> bool {
        get_path(&self.data, &parse_path(key)).is_some()
    }

    /// A copy of the whole store.
    pub fn snapshot(&self) -> Mapping {
        self.data.as_mapping().cloned().unwrap_or_default()
    }

    /// Close the store to further writes.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The resolved path registered for `kind`, ignoring empty strings.
    pub fn path_for(&self, kind: StoreKind) -> Option<PathBuf> {
        self.get_str(&kind.path_key())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    /// The file name to look for when resolving `kind`.
    pub fn file_name(&self, kind: StoreKind) -> String {
        self.get_str(&kind.file_key())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| kind.file_name().to_string())
    }

    /// The working directory recorded at start-up.
    pub fn cwd(&self) -> PathBuf {
        self.get_str("path.cwd")
            .map(PathBuf::from)
            .unwrap_or_else(defaults::default_cwd)
    }

    /// The per-user microbs directory.
    pub fn user_dir(&self) -> PathBuf {
        self.get_str("path.user")
            .map(PathBuf::from)
            .unwrap_or_else(defaults::default_user_dir)
    }

    pub fn command(&self) -> Option<String> {
        self.get_str("command")
    }

    pub fn log_level(&self) -> String {
        self.get_str("log.level")
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}
