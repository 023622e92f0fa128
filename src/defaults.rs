//! Default values for microbs store resolution.
//!
//! This module provides centralized default values used across the stores
//! and the CLI, ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

use log::warn;
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Canonical file name of the config store.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Canonical file name of the state store.
pub const STATE_FILE_NAME: &str = "state.yaml";

/// Name of the per-user dotfile directory under the home directory.
pub const USER_DIR_NAME: &str = ".microbs";

/// Command recorded in the context when none was given.
pub const DEFAULT_COMMAND: &str = "help";

/// Log level recorded in the context when none was given.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Returns the per-user microbs directory.
///
/// This is `~/.microbs` on every platform. Falls back to `.microbs` in the
/// current directory if the home directory cannot be determined.
pub fn default_user_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(USER_DIR_NAME)
}

/// Returns the process working directory, or `.` if it cannot be read.
pub fn default_cwd() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Converts a filesystem path into a context value.
///
/// # Errors
///
/// Returns `Error::NonUtf8Path` if the path is not valid UTF-8. A lossy
/// conversion would name a different file.
pub fn path_value(path: &Path) -> Result<Value> {
    path.to_str()
        .map(|s| Value::String(s.to_owned()))
        .ok_or_else(|| Error::NonUtf8Path {
            path: path.to_path_buf(),
        })
}

/// Builds the default context skeleton.
///
/// ```yaml
/// path:
///   cwd: <process working directory>
///   user: ~/.microbs
/// file:
///   config: config.yaml
///   state: state.yaml
/// command: help
/// log:
///   level: info
/// ```
///
/// Caller-supplied overrides are merged over this skeleton by
/// [`Context::init`](crate::context::Context::init).
pub fn context_skeleton() -> Mapping {
    let mut path = Mapping::new();
    for (key, dir) in [("cwd", default_cwd()), ("user", default_user_dir())] {
        match path_value(&dir) {
            Ok(value) => {
                path.insert(key.into(), value);
            }
            Err(e) => warn!("Not recording path.{} in the context: {}", key, e),
        }
    }

    let mut file = Mapping::new();
    file.insert("config".into(), CONFIG_FILE_NAME.into());
    file.insert("state".into(), STATE_FILE_NAME.into());

    let mut log = Mapping::new();
    log.insert("level".into(), DEFAULT_LOG_LEVEL.into());

    let mut skeleton = Mapping::new();
    skeleton.insert("path".into(), Value::Mapping(path));
    skeleton.insert("file".into(), Value::Mapping(file));
    skeleton.insert("command".into(), DEFAULT_COMMAND.into());
    skeleton.insert("log".into(), Value::Mapping(log));
    skeleton
}
