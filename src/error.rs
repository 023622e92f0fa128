//! # Error Handling
//!
//! This module defines the centralized error type for the `microbs` store
//! layer. It uses `thiserror` to build a single `Error` enum whose variants
//! carry the file path or key involved, so every failure that reaches the
//! operator names what it was working on.
//!
//! ## Key Components
//!
//! - **`Error`**: every failure the Context, Config and State stores can
//!   report.
//! - **`Result<T>`**: a type alias for `std::result::Result<T, Error>`.
//!
//! Duplicate writes to the Context are *not* errors. They are an expected
//! outcome and are reported through a `bool` return value instead.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for microbs store operations
#[derive(Error, Debug)]
pub enum Error {
    /// A resolved store file does not exist on disk.
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Reading a store file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a store file failed.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A store file is not a valid document.
    ///
    /// Includes the offending path and an optional hint about how to fix it.
    #[error("Failed to parse {}: {message}{}", path.display(), hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Parse {
        path: PathBuf,
        message: String,
        /// Optional hint for how to fix the document
        hint: Option<String>,
    },

    /// An absent value was written to the Context, which would be
    /// indistinguishable from deleting the key.
    #[error("Refusing to set an absent value for context key '{key}'")]
    AbsentValue { key: String },

    /// A dotted key could not be used to address a value.
    #[error("Invalid key '{key}': {message}")]
    InvalidKey { key: String, message: String },

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A path that cannot be stored as text without changing which file it
    /// names.
    #[error("Path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let error = Error::NotFound {
            path: PathBuf::from("/tmp/config.yaml"),
        };
        let display = format!("{}", error);
        assert!(display.contains("File not found"));
        assert!(display.contains("/tmp/config.yaml"));
    }

    #[test]
    fn test_error_display_parse_with_hint() {
        let error = Error::Parse {
            path: PathBuf::from("state.yaml"),
            message: "document root must be a mapping".to_string(),
            hint: Some("Wrap the values in 'key: value' pairs".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to parse state.yaml"));
        assert!(display.contains("document root must be a mapping"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn test_error_display_parse_without_hint() {
        let error = Error::Parse {
            path: PathBuf::from("config.yaml"),
            message: "bad indentation".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_absent_value() {
        let error = Error::AbsentValue {
            key: "path.config".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("absent value"));
        assert!(display.contains("path.config"));
    }

    #[test]
    fn test_error_display_write_names_path() {
        let error = Error::Write {
            path: PathBuf::from("/readonly/state.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to write /readonly/state.yaml"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_error_display_non_utf8_path() {
        let error = Error::NonUtf8Path {
            path: PathBuf::from("/tmp/state.yaml"),
        };
        let display = format!("{}", error);
        assert!(display.contains("not valid UTF-8"));
        assert!(display.contains("/tmp/state.yaml"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_str = "invalid: [unclosed";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: Error = yaml_error.into();
        let display = format!("{}", error);
        assert!(display.contains("YAML error"));
    }
}
