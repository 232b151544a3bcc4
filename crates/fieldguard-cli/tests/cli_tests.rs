//! # CLI Exit Codes
//!
//! Runs the built `fieldguard` binary: 0 for a valid or unmatched request,
//! 1 for a rejected one, 2 for an unusable configuration.

use std::path::PathBuf;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fieldguard"))
}

fn write_config(dir: &tempfile::TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("routes.yaml");
    std::fs::write(&path, text).unwrap();
    path
}

const ROUTES: &str = "routes:\n  - path: /users\n    fields:\n      name: [required, string]\n";

#[test]
fn test_lint_ok() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, ROUTES);
    let output = bin().arg("lint").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("/users [body]"));
}

#[test]
fn test_lint_unknown_rule_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        "routes:\n  - path: /users\n    fields:\n      name: [mandatory]\n",
    );
    let output = bin().arg("lint").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("mandatory"));
}

#[test]
fn test_check_rejected_body() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, ROUTES);
    let body = dir.path().join("body.json");
    std::fs::write(&body, r#"{"name": 5}"#).unwrap();

    let output = bin()
        .arg("check")
        .arg(&config)
        .args(["--path", "/users", "--body"])
        .arg(&body)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["errors"]["name"], "name must be a string");
}

#[test]
fn test_check_valid_body() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, ROUTES);
    let body = dir.path().join("body.json");
    std::fs::write(&body, r#"{"name": "Ann"}"#).unwrap();

    let status = bin()
        .arg("check")
        .arg(&config)
        .args(["--path", "/users", "--body"])
        .arg(&body)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));
}
