//! Integration tests for `btsctl config`.
//!
//! All filesystem-touching tests set `BTSCTL_CONFIG` to a temp path so they
//! never read or write `~/.btsctl/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn btsctl(config: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("btsctl"));
    cmd.env("NO_COLOR", "1").env("BTSCTL_CONFIG", config);
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

// ---------------------------------------------------------------------------
// Subcommand registration
// ---------------------------------------------------------------------------

#[test]
fn test_config_help_shows_subcommands() {
    let (_dir, path) = temp_config_path();
    btsctl(&path)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("path"));
}

// ---------------------------------------------------------------------------
// show / path
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_without_file_prints_defaults() {
    let (_dir, path) = temp_config_path();
    btsctl(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wmi.computer:"))
        .stdout(predicate::str::contains("(not set)"))
        .stdout(predicate::str::contains("BTSCTL_CONFIG:"));
}

#[test]
fn test_config_show_json_includes_path_and_settings() {
    let (_dir, path) = temp_config_path();
    let output = btsctl(&path)
        .args(["config", "show", "--json"])
        .output()
        .expect("run btsctl");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["path"], path.as_str());
    assert_eq!(value["config"]["wmi"]["computer"], ".");
    assert_eq!(value["config"]["wmi"]["operation_timeout_secs"], 60);
}

#[test]
fn test_config_path_prints_override() {
    let (_dir, path) = temp_config_path();
    btsctl(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

#[test]
fn test_config_set_persists_value() {
    let (_dir, path) = temp_config_path();
    btsctl(&path)
        .args(["config", "set", "wmi.computer", "BTS01"])
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).expect("config written");
    assert!(content.contains("computer: BTS01"), "got: {content}");

    btsctl(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BTS01"));
}

#[test]
fn test_config_set_probing_paths_splits_on_semicolons() {
    let (_dir, path) = temp_config_path();
    btsctl(&path)
        .args(["config", "set", "probing_paths", r"C:\Deploy; D:\Shared"])
        .assert()
        .success();

    let output = btsctl(&path)
        .args(["--json", "config", "show"])
        .output()
        .expect("run btsctl");
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["config"]["probing_paths"], serde_json::json!([r"C:\Deploy", r"D:\Shared"]));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    btsctl(&path)
        .args(["config", "set", "security.level", "strict"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown setting: security.level"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_timeout_fails() {
    let (_dir, path) = temp_config_path();
    btsctl(&path)
        .args(["config", "set", "wmi.operation_timeout_secs", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid value for wmi.operation_timeout_secs"));
}

#[test]
fn test_config_set_unknown_key_json_error() {
    let (_dir, path) = temp_config_path();
    let output = btsctl(&path)
        .args(["--json", "config", "set", "nope", "x"])
        .output()
        .expect("run btsctl");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "error");
    assert!(value["message"].as_str().unwrap().contains("Unknown setting"));
}

#[test]
fn test_malformed_config_file_fails_every_command() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "wmi: [not, a, map]").unwrap();
    btsctl(&path)
        .args(["config", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}
