//! CLI end-to-end tests that invoke the compiled `srcsync` binary.
//!
//! Upstreams are real git repositories on the local filesystem, so no
//! network access is needed.

use assert_cmd::Command;
use predicates::prelude::*;
use srcsync_test_utils::git::roles_upstream;
use srcsync_test_utils::workspace::{TestWorkspace, manifest_yaml};
use std::fs;

/// Get a Command for the srcsync binary running inside `ws`.
fn srcsync(ws: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("srcsync").expect("Failed to find srcsync binary");
    cmd.current_dir(ws.output_dir())
        .env("SRCSYNC_CACHE_DIR", ws.cache_dir())
        .env("NO_COLOR", "1");
    cmd
}

// ============================================================================
// Argument handling
// ============================================================================

#[test]
fn test_help_exits_zero() {
    let ws = TestWorkspace::new();
    srcsync(&ws)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_unknown_subcommand_exits_four() {
    let ws = TestWorkspace::new();
    srcsync(&ws).arg("frobnicate").assert().code(4);
}

#[test]
fn test_missing_manifest_exits_four() {
    let ws = TestWorkspace::new();
    srcsync(&ws)
        .arg("sync")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("manifest.yml"));
}

// ============================================================================
// sync / check lifecycle
// ============================================================================

#[test]
fn test_check_before_sync_exits_one() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles")]));

    srcsync(&ws)
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no-status-file"));
}

#[test]
fn test_sync_then_check_exits_zero() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(
        &upstream.url(),
        "v0.2",
        &[("playbooks/playbook1.yml", "playbook1.yml")],
    ));

    srcsync(&ws)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("testrepo"));
    ws.assert_file_contains("playbook1.yml", "hosts: all");

    srcsync(&ws)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("up-to-date"));
}

#[test]
fn test_edited_manifest_exits_two() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles")]));
    srcsync(&ws).arg("sync").assert().success();

    ws.write_manifest(&manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles2")]));

    srcsync(&ws).arg("check").assert().code(2);
}

#[test]
fn test_upstream_commit_exits_three() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "master", &[("roles/*", "roles")]));
    srcsync(&ws).arg("sync").assert().success();

    upstream.write("roles/dummyrole1/tasks/main.yml", "- debug: msg=changed\n");
    upstream.commit("Change role one");

    srcsync(&ws)
        .arg("check")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("content-changed"));
}

#[test]
fn test_check_json_reports_status_and_exit_code() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles")]));
    srcsync(&ws).arg("sync").assert().success();

    let output = srcsync(&ws).args(["check", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "up-to-date");
    assert_eq!(json["exit_code"], 0);
}

#[test]
fn test_sync_json_lists_commits() {
    let (upstream, history) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles")]));

    let output = srcsync(&ws).args(["sync", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["repos"][0]["commit"], history.tagged.as_str());
    assert_eq!(json["copied"], 1);
}

#[test]
fn test_output_dir_flag_overrides_manifest() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles")]));
    let elsewhere = tempfile::TempDir::new().unwrap();

    srcsync(&ws)
        .args(["sync", "-o"])
        .arg(elsewhere.path())
        .assert()
        .success();

    assert!(elsewhere.path().join("roles/dummyrole1/tasks/main.yml").is_file());
    assert!(elsewhere.path().join(".srcsync-status.yml").is_file());
    ws.assert_missing("roles");
}

#[test]
fn test_unknown_revision_exits_four_without_status() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "no-such-tag", &[("roles", "roles")]));

    srcsync(&ws)
        .arg("sync")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("no-such-tag"));
    ws.assert_missing(".srcsync-status.yml");
}

#[test]
fn test_manifest_flag_selects_file() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    let manifest = manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles")]);
    fs::write(ws.output_path("deps.yml"), manifest).unwrap();

    srcsync(&ws).args(["sync", "-m", "deps.yml"]).assert().success();
    ws.assert_exists("roles/dummyrole2/tasks/main.yml");
    ws.assert_exists("deps.yml");
}
