//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_config(configs::GENERIC);
//! fixture.command().args(["config", "get"]).assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::configs;
    pub use super::TestFixture;
}

/// Common config and state documents for testing.
#[allow(dead_code)]
pub mod configs {
    /// A nested config in the shape microbs deployments use.
    pub const GENERIC: &str = r#"
deployment:
  name: test-nested
  app: templates
  plugins:
    alerts: template
otlp:
  receiver:
    host: otel-collector
    port: 4317
"#;

    /// A state file that overlaps with `GENERIC` on `deployment.name`.
    pub const STATE: &str = r#"
deployment:
  name: stale
elastic:
  url: https://elastic.example.com
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "deployment: [unclosed";
}

/// A test fixture with a working directory and a separate microbs home.
///
/// Commands run from [`TestFixture::command`] use the working directory as
/// their current directory and the home directory through `MICROBS_HOME`,
/// so nothing touches the real `~/.microbs`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with empty `work/` and `home/` directories.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("work")
            .create_dir_all()
            .expect("Failed to create work directory");
        temp_dir
            .child("home")
            .create_dir_all()
            .expect("Failed to create home directory");
        Self { temp_dir }
    }

    /// Add a `config.yaml` to the working directory.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("work/config.yaml", content)
    }

    /// Add a `state.yaml` to the working directory.
    pub fn with_state(self, content: &str) -> Self {
        self.with_file("work/state.yaml", content)
    }

    /// Add a file relative to the fixture root.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// The working directory commands run in.
    pub fn work_dir(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    /// The microbs home directory.
    pub fn home_dir(&self) -> PathBuf {
        self.temp_dir.path().join("home")
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read a file relative to the fixture root.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.temp_dir.path().join(path)).expect("Failed to read file")
    }

    /// Create a command configured to run in this fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("microbs");
        cmd.current_dir(self.work_dir())
            .env("MICROBS_HOME", self.home_dir())
            .env_remove("MICROBS_CONFIG")
            .env_remove("MICROBS_STATE")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_directories() {
        let fixture = TestFixture::new();
        assert!(fixture.work_dir().is_dir());
        assert!(fixture.home_dir().is_dir());
    }

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_config(configs::GENERIC);
        assert!(fixture.work_dir().join("config.yaml").exists());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        for doc in [configs::GENERIC, configs::STATE] {
            serde_yaml::from_str::<serde_yaml::Value>(doc).expect("Document should be valid YAML");
        }
        assert!(serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML).is_err());
    }
}
