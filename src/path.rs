//! Store file resolution
//!
//! Decides which file on disk backs the config or the state store. The
//! candidates are tried in order and the first match wins:
//!
//! 1. An explicit path passed by the caller (mostly tests).
//! 2. A path already registered in the context as `path.config` or
//!    `path.state`. The CLI registers `--config`/`--state` here at start-up.
//! 3. `config.yaml` / `state.yaml` in the working directory, if it exists.
//! 4. The same file under `~/.microbs`, if it exists.
//! 5. Nothing. Callers decide what a missing file means for them.
//!
//! Resolution has no side effects and is not cached here.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::context::Context;
use crate::defaults::{CONFIG_FILE_NAME, STATE_FILE_NAME};

/// The two file-backed stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Config,
    State,
}

impl StoreKind {
    /// Lower-case name, also the suffix of the context keys for this store.
    pub fn name(self) -> &'static str {
        match self {
            StoreKind::Config => "config",
            StoreKind::State => "state",
        }
    }

    /// Canonical file name.
    pub fn file_name(self) -> &'static str {
        match self {
            StoreKind::Config => CONFIG_FILE_NAME,
            StoreKind::State => STATE_FILE_NAME,
        }
    }

    /// Context key holding a previously resolved path (`path.config`).
    pub fn path_key(self) -> String {
        format!("path.{}", self.name())
    }

    /// Context key holding the file name to look for (`file.config`).
    pub fn file_key(self) -> String {
        format!("file.{}", self.name())
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve the backing file for `kind`.
pub fn resolve(context: &Context, kind: StoreKind, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        debug!("Using explicit {} path {}", kind, path.display());
        return Some(path.to_path_buf());
    }

    if let Some(path) = context.path_for(kind) {
        debug!("Using {} path from context: {}", kind, path.display());
        return Some(path);
    }

    let file_name = context.file_name(kind);
    for dir in [context.cwd(), context.user_dir()] {
        let candidate = dir.join(&file_name);
        if candidate.exists() {
            debug!("Found {} file at {}", kind, candidate.display());
            return Some(candidate);
        }
    }

    debug!("No {} file found", kind);
    None
}

/// Where a store's file is created when [`resolve`] finds nothing.
pub fn default_location(context: &Context, kind: StoreKind) -> PathBuf {
    context.user_dir().join(context.file_name(kind))
}
