//! End-to-end tests for the `config` and `context` commands.
//!
//! These tests invoke the actual CLI binary and validate read-only access to
//! the config file and the invocation context.

mod common;
use common::prelude::*;

/// Test that config get prints a single scalar without quotes
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_config_get_scalar() {
    let fixture = TestFixture::new().with_config(configs::GENERIC);

    fixture
        .command()
        .args(["config", "get", "deployment.name"])
        .assert()
        .success()
        .stdout("test-nested\n");
}

/// Test that config get of a prefix prints the subtree
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_config_get_subtree_json() {
    let fixture = TestFixture::new().with_config(configs::GENERIC);

    let output = fixture
        .command()
        .args(["config", "get", "otlp.receiver", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["host"], "otel-collector");
    assert_eq!(json["port"], 4317);
}

/// Test that config get without a key prints the flattened config
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_config_get_all() {
    let fixture = TestFixture::new().with_config(configs::GENERIC);

    fixture
        .command()
        .args(["config", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deployment.plugins.alerts: template"))
        .stdout(predicate::str::contains("otlp.receiver.port: 4317"));
}

/// Test that a missing key exits non-zero with nothing on stdout
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_config_get_missing_key() {
    let fixture = TestFixture::new().with_config(configs::GENERIC);

    fixture
        .command()
        .args(["config", "get", "docker.registry"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("docker.registry"));
}

/// Test that config has succeeds only when every key is set
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_config_has() {
    let fixture = TestFixture::new().with_config(configs::GENERIC);

    fixture
        .command()
        .args(["config", "has", "deployment.name", "otlp.receiver.port"])
        .assert()
        .success()
        .stdout("");

    fixture
        .command()
        .args(["config", "has", "deployment.name", "docker.registry"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("docker.registry"));
}

/// Test that --config points at a file outside the working directory
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_config_flag() {
    let fixture = TestFixture::new().with_file("elsewhere/prod.yaml", "deployment:\n  name: prod\n");

    fixture
        .command()
        .arg("--config")
        .arg(fixture.path().join("elsewhere/prod.yaml"))
        .args(["config", "get", "deployment.name"])
        .assert()
        .success()
        .stdout("prod\n");
}

/// Test that MICROBS_CONFIG is honored
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_config_env_var() {
    let fixture = TestFixture::new().with_file("prod.yaml", "deployment:\n  name: from-env\n");

    fixture
        .command()
        .env("MICROBS_CONFIG", fixture.path().join("prod.yaml"))
        .args(["config", "get", "deployment.name"])
        .assert()
        .success()
        .stdout("from-env\n");
}

/// Test that the home directory is the fallback location
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_config_from_home_dir() {
    let fixture = TestFixture::new().with_file("home/config.yaml", "deployment:\n  name: home\n");

    fixture
        .command()
        .args(["config", "get", "deployment.name"])
        .assert()
        .success()
        .stdout("home\n");
}

/// Test that a missing explicit config file is reported
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_config_missing_file() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["--config", "nope.yaml", "config", "get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.yaml"));
}

/// Test that a malformed config file is reported with its path
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_config_invalid_yaml() {
    let fixture = TestFixture::new().with_config(configs::INVALID_YAML);

    fixture
        .command()
        .args(["config", "get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.yaml"));
}

/// Test that context reports the command and resolved paths
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_context_shows_invocation() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["context", "command"])
        .assert()
        .success()
        .stdout("context\n");

    fixture
        .command()
        .args(["context", "path.user"])
        .assert()
        .success()
        .stdout(format!("{}\n", fixture.home_dir().display()));

    fixture
        .command()
        .args(["--log-level", "debug", "context", "log.level"])
        .assert()
        .success()
        .stdout("debug\n");
}

/// Test that the whole context prints as JSON
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_context_json() {
    let fixture = TestFixture::new();

    let output = fixture.command().args(["context", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["file"]["config"], "config.yaml");
    assert_eq!(json["args"][0], "context");
}

/// Test that completions are generated for bash
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("microbs");

    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("microbs"));
}
