//! # Session
//!
//! A [`Session`] owns the three stores for one command invocation. The stores
//! are built once at start-up and passed to whatever needs them; there is no
//! process-wide instance.
//!
//! State reads and writes need the context (for path resolution) and the
//! config (to merge over loaded state) alongside the state store itself. The
//! helpers here split those borrows so callers only hold the session.

use std::path::{Path, PathBuf};

use log::info;
use serde_yaml::Value as YamlValue;

use crate::config::ConfigStore;
use crate::context::Context;
use crate::envfile;
use crate::error::Result;
use crate::state::StateStore;

/// The context, config and state for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub context: Context,
    pub config: ConfigStore,
    pub state: StateStore,
}

impl Session {
    /// Start a session around an already initialized context. Config and
    /// state load lazily on first access.
    pub fn new(context: Context) -> Self {
        Self {
            context,
            config: ConfigStore::new(),
            state: StateStore::new(),
        }
    }

    pub fn config_get(&mut self, key: &str) -> Result<Option<YamlValue>> {
        self.config.get(&self.context, key)
    }

    /// Whether every key in `keys` is set in config.
    pub fn config_has(&mut self, keys: &[&str]) -> Result<bool> {
        self.config.has_all(&self.context, keys)
    }

    pub fn state_get(&mut self, key: &str) -> Result<Option<YamlValue>> {
        self.state.get(&self.context, &mut self.config, key)
    }

    /// Write `value` at `key` in state. `None` removes the key.
    pub fn state_set(&mut self, key: &str, value: impl Into<Option<YamlValue>>) -> Result<()> {
        self.state.set(&self.context, &mut self.config, key, value)
    }

    /// Persist state, returning the path written.
    pub fn state_save(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        self.state.save(&self.context, &mut self.config, path)
    }

    /// Save state and write every state value to an env file at `path`.
    ///
    /// Returns the path the state was saved to.
    pub fn stage_env(&mut self, path: &Path) -> Result<PathBuf> {
        let saved = self.state_save(None)?;
        let values = self.state.all(&self.context, &mut self.config)?;
        envfile::write(values, path)?;
        info!("Wrote {} variable(s) to {}", values.len(), path.display());
        Ok(saved)
    }
}
