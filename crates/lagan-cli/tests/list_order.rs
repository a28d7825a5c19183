//! Integration tests for `lagan list` ordering and scoping.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "lagan-cli", "--bin", "lagan", "--"]);
    cmd
}

/// Helper to create a workspace member with the given dependencies.
fn create_member(root: &Path, name: &str, deps: &[&str]) {
    let dir = root.join("packages").join(name);
    fs::create_dir_all(&dir).unwrap();

    let deps_obj: serde_json::Map<String, serde_json::Value> = deps
        .iter()
        .map(|d| (d.to_string(), serde_json::json!("1.0.0")))
        .collect();
    let manifest = serde_json::json!({
        "name": name,
        "version": "1.0.0",
        "dependencies": deps_obj
    });
    fs::write(
        dir.join("package.json"),
        serde_json::to_string_pretty(&manifest).unwrap(),
    )
    .unwrap();
}

/// Helper to create a workspace root with packages/* members.
fn create_workspace(root: &Path) {
    fs::write(
        root.join("package.json"),
        r#"{"name": "monorepo", "workspaces": ["packages/*"]}"#,
    )
    .unwrap();
}

fn package_names(json: &serde_json::Value) -> Vec<String> {
    json["packages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

/// a depends on b, b depends on c: list order must be [c, b, a].
#[test]
fn test_list_full_order() {
    let dir = tempdir().unwrap();
    create_workspace(dir.path());
    create_member(dir.path(), "a", &["b"]);
    create_member(dir.path(), "b", &["c"]);
    create_member(dir.path(), "c", &[]);

    let output = cargo_bin()
        .args(["--json", "list", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("failed to run lagan list");

    assert!(output.status.success(), "list should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|_| panic!("stdout should be valid JSON: {stdout}"));

    assert_eq!(json["ok"].as_bool(), Some(true));
    assert_eq!(package_names(&json), vec!["c", "b", "a"]);
}

/// Closure scope: only the target's dependencies, target last.
#[test]
fn test_list_closure_scope() {
    let dir = tempdir().unwrap();
    create_workspace(dir.path());
    create_member(dir.path(), "a", &["b"]);
    create_member(dir.path(), "b", &["c"]);
    create_member(dir.path(), "c", &[]);
    create_member(dir.path(), "standalone", &[]);

    let output = cargo_bin()
        .args([
            "--json",
            "list",
            "--package",
            "b",
            "--this-package-only",
            "--cwd",
        ])
        .arg(dir.path())
        .output()
        .expect("failed to run lagan list");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    // standalone and a are outside b's closure; b itself is last.
    assert_eq!(package_names(&json), vec!["c", "b"]);
}

/// External (non-workspace) dependencies never show up in the output.
#[test]
fn test_list_skips_external_dependencies() {
    let dir = tempdir().unwrap();
    create_workspace(dir.path());
    create_member(dir.path(), "app", &["lib", "left-pad"]);
    create_member(dir.path(), "lib", &[]);

    let output = cargo_bin()
        .args(["--json", "list", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("failed to run lagan list");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(package_names(&json), vec!["lib", "app"]);
}

/// A dependency cycle is a structural error: nonzero exit, stable code.
#[test]
fn test_list_cycle_is_fatal() {
    let dir = tempdir().unwrap();
    create_workspace(dir.path());
    create_member(dir.path(), "x", &["y"]);
    create_member(dir.path(), "y", &["x"]);

    let output = cargo_bin()
        .args(["--json", "list", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("failed to run lagan list");

    assert!(!output.status.success(), "cycle should fail the run");
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json["ok"].as_bool(), Some(false));
    assert_eq!(json["error"]["code"].as_str(), Some("GRAPH_CYCLE"));
}

/// Unknown closure target is a structural error.
#[test]
fn test_list_unknown_package_is_fatal() {
    let dir = tempdir().unwrap();
    create_workspace(dir.path());
    create_member(dir.path(), "a", &[]);

    let output = cargo_bin()
        .args([
            "--json",
            "list",
            "--package",
            "ghost",
            "--this-package-only",
            "--cwd",
        ])
        .arg(dir.path())
        .output()
        .expect("failed to run lagan list");

    assert!(!output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json["error"]["code"].as_str(), Some("GRAPH_UNKNOWN_NODE"));
}

/// Without a workspaces field there is nothing to list.
#[test]
fn test_list_no_workspaces() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"name": "regular-project"}"#,
    )
    .unwrap();

    let output = cargo_bin()
        .args(["--json", "list", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("failed to run lagan list");

    assert!(!output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json["error"]["code"].as_str(), Some("NO_WORKSPACES"));
}

/// Scope flags appear in help output.
#[test]
fn test_help_shows_scope_flags() {
    let output = cargo_bin()
        .args(["install", "--help"])
        .output()
        .expect("failed to run lagan install --help");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--package"), "help should show --package");
    assert!(
        stdout.contains("--this-package-only"),
        "help should show --this-package-only"
    );
    assert!(
        stdout.contains("--continue-on-error"),
        "help should show --continue-on-error"
    );
}
