//! Integration tests for the bigmodel CLI
//!
//! These tests run the actual CLI binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const REGISTRY: &str = r#"
allow_cache = true

[sources.A]
kind = "static"
value = { UserId = 100 }

[sources.B]
kind = "file"
path = "user.json"
"#;

const MODEL: &str = r#"
ID:
  tag: 'source:"A" field:"UserId"'
UserName:
  source: B
"#;

/// Get the binary to test
fn bigmodel_cmd() -> Command {
    let mut cmd = Command::cargo_bin("bigmodel").unwrap();
    cmd.env_remove("BIGMODEL_ALLOW_CACHE")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Write registry, model and source files into a fresh directory
fn fixture(registry: &str, model: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("registry.toml"), registry).unwrap();
    fs::write(temp_dir.path().join("model.yaml"), model).unwrap();
    fs::write(
        temp_dir.path().join("user.json"),
        r#"{"UserName": "guanming"}"#,
    )
    .unwrap();
    temp_dir
}

fn args(subcommand: &str, dir: &TempDir) -> Vec<String> {
    vec![
        subcommand.to_string(),
        "--config".to_string(),
        dir.path().join("registry.toml").display().to_string(),
        "--model".to_string(),
        dir.path().join("model.yaml").display().to_string(),
    ]
}

#[test]
fn test_help_flag() {
    bigmodel_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bind model slots"));
}

#[test]
fn test_resolve_help() {
    bigmodel_cmd()
        .args(["resolve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-cache"))
        .stdout(predicate::str::contains("--repeat"));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_reports_bound_slots() {
    let dir = fixture(REGISTRY, MODEL);
    bigmodel_cmd()
        .args(args("validate", &dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 slots bound"));
}

#[test]
fn test_validate_missing_factory() {
    let dir = fixture(REGISTRY, "Email:\n  source: C\n");
    bigmodel_cmd()
        .args(args("validate", &dir))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("BIGMODEL-002"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_validate_not_a_record() {
    let dir = fixture(REGISTRY, "- ID\n- UserName\n");
    bigmodel_cmd()
        .args(args("validate", &dir))
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIGMODEL-001"));
}

#[test]
fn test_validate_bad_config() {
    let dir = fixture("allow_cache = \"yes please\"", MODEL);
    bigmodel_cmd()
        .args(args("validate", &dir))
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIGMODEL-020"));
}

#[test]
fn test_validate_missing_model_file() {
    let dir = fixture(REGISTRY, MODEL);
    fs::remove_file(dir.path().join("model.yaml")).unwrap();
    bigmodel_cmd()
        .args(args("validate", &dir))
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIGMODEL-022"));
}

// ============================================================================
// resolve
// ============================================================================

#[test]
fn test_resolve_prints_values() {
    let dir = fixture(REGISTRY, MODEL);
    bigmodel_cmd()
        .args(args("resolve", &dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("ID = 100"))
        .stdout(predicate::str::contains("UserName = \"guanming\""));
}

#[test]
fn test_resolve_repeat_prints_rounds() {
    let dir = fixture(REGISTRY, MODEL);
    bigmodel_cmd()
        .args(args("resolve", &dir))
        .args(["--repeat", "3", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("round 3"))
        .stdout(predicate::str::contains("ID = 100").count(3));
}

#[test]
fn test_resolve_missing_field_fails() {
    let dir = fixture(REGISTRY, "Email:\n  source: A\n");
    bigmodel_cmd()
        .args(args("resolve", &dir))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Email = "))
        .stderr(predicate::str::contains("BIGMODEL-011"));
}

#[test]
fn test_resolve_env_override_rejects_garbage() {
    let dir = fixture(REGISTRY, MODEL);
    bigmodel_cmd()
        .env("BIGMODEL_ALLOW_CACHE", "sometimes")
        .args(args("resolve", &dir))
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIGMODEL_ALLOW_CACHE"));
}

#[test]
fn test_resolve_unreadable_file_source_names_the_file() {
    let dir = fixture(REGISTRY, MODEL);
    fs::write(dir.path().join("user.json"), "{ broken").unwrap();
    bigmodel_cmd()
        .args(args("resolve", &dir))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("ID = 100"))
        .stderr(predicate::str::contains("BIGMODEL-013"))
        .stderr(predicate::str::contains("user.json"));
}
