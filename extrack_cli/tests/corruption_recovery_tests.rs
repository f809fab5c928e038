//! Corruption recovery tests for extrack.
//!
//! These tests verify the system can handle:
//! - Corrupted store files
//! - Empty store files
//! - Stale recorded counts
//! - Broken configuration

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("extrack"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config-home"))
        .arg("--data-dir")
        .arg(temp_dir.path());
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_store_reports_storage_failure() {
    let temp_dir = setup_test_dir();
    let store_path = temp_dir.path().join("users.json");
    fs::write(&store_path, "{ invalid json }}}}").expect("Failed to write corrupted store");

    cli(&temp_dir)
        .args(["users", "list"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"kind\": \"storage\""));

    cli(&temp_dir)
        .args(["users", "add", "alice"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("corrupt store file"));

    // Nothing overwrote the damaged file
    let contents = fs::read_to_string(&store_path).unwrap();
    assert_eq!(contents, "{ invalid json }}}}");
}

#[test]
fn test_empty_store_file_treated_as_empty() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("users.json"), "").unwrap();

    cli(&temp_dir)
        .args(["users", "add", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"username\": \"alice\""));
}

#[test]
fn test_stale_count_is_recomputed() {
    let temp_dir = setup_test_dir();
    let id = "6f1c2a58-8d8e-4a52-9a7b-2f4d3c1e0b9a";
    let store = format!(
        r#"{{"users":[{{"_id":"{}","username":"alice","count":42,"log":[{{"description":"run","duration":30,"date":"2023-09-09"}}]}}]}}"#,
        id
    );
    fs::write(temp_dir.path().join("users.json"), store).unwrap();

    let output = cli(&temp_dir)
        .args(["log", id])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let log: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(log["count"], 1);
}

#[test]
fn test_invalid_config_file_fails_cleanly() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[query\ndefault_limit = ").unwrap();

    cli(&temp_dir)
        .arg("--config")
        .arg(&config_path)
        .args(["users", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
