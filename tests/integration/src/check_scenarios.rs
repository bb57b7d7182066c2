//! End-to-end check scenarios: every outcome a stale output tree can have

use pretty_assertions::assert_eq;
use srcsync_core::{CheckReport, CheckStatus, Manifest, MirrorEngine};
use srcsync_fs::MirrorPath;
use srcsync_git::GitMaterializer;
use srcsync_test_utils::git::roles_upstream;
use srcsync_test_utils::workspace::{TestWorkspace, manifest_yaml};
use std::fs;

fn engine(ws: &TestWorkspace) -> MirrorEngine<GitMaterializer> {
    MirrorEngine::new(ws.cache_dir(), GitMaterializer::new())
}

fn sync(ws: &TestWorkspace) {
    let manifest = Manifest::load(&ws.manifest_path(), None).unwrap();
    engine(ws).sync(&manifest).unwrap();
}

fn check(ws: &TestWorkspace) -> CheckReport {
    let manifest = Manifest::load(&ws.manifest_path(), None).unwrap();
    engine(ws).check(&manifest).unwrap()
}

#[test]
fn fresh_sync_is_up_to_date() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(
        &upstream.url(),
        "v0.2",
        &[("roles/*", "roles"), ("playbooks/playbook1.yml", "")],
    ));

    sync(&ws);

    assert_eq!(check(&ws).status, CheckStatus::UpToDate);
    // Glob destinations are only cleaned for current matches
    ws.assert_exists("roles/dummyrole1/tasks/main.yml");
    ws.assert_exists("roles/dummyrole2/tasks/main.yml");
}

#[test]
fn check_does_not_touch_output() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "master", &[("roles", "roles")]));
    sync(&ws);

    upstream.write("roles/dummyrole4/tasks/main.yml", "- debug: msg=role4\n");
    upstream.commit("Add fourth role");

    assert_eq!(check(&ws).status, CheckStatus::ContentChanged);
    ws.assert_missing("roles/dummyrole4");
}

#[test]
fn deleted_status_file_is_no_status_file() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles")]));
    sync(&ws);

    fs::remove_file(ws.output_path(MirrorPath::StatusFile.as_str())).unwrap();

    assert_eq!(check(&ws).status, CheckStatus::NoStatusFile);
}

#[test]
fn edited_manifest_is_manifest_changed() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles")]));
    sync(&ws);

    // Whitespace alone changes the fingerprint
    let mut content = fs::read_to_string(ws.manifest_path()).unwrap();
    content.push('\n');
    ws.write_manifest(&content);

    assert_eq!(check(&ws).status, CheckStatus::ManifestChanged);
}

#[test]
fn forged_older_commit_is_content_changed() {
    let (upstream, history) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "master", &[("roles", "roles2")]));
    sync(&ws);

    let status_path = ws.output_path(MirrorPath::StatusFile.as_str());
    let status = fs::read_to_string(&status_path).unwrap();
    assert!(status.contains(&history.head));
    fs::write(&status_path, status.replace(&history.head, &history.tagged)).unwrap();

    let report = check(&ws);

    assert_eq!(report.status, CheckStatus::ContentChanged);
    assert!(report.path.unwrap().ends_with("roles2"));
}

#[test]
fn branch_advance_is_content_changed() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(
        &upstream.url(),
        "master",
        &[("playbooks/playbook1.yml", "playbook1.yml")],
    ));
    sync(&ws);

    upstream.write("NEWS.md", "release notes\n");
    upstream.commit("Unrelated change");

    // Any new commit counts, even one that leaves the copied file alone
    assert_eq!(check(&ws).status, CheckStatus::ContentChanged);
}

#[test]
fn pinned_tag_ignores_branch_advance() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles")]));
    sync(&ws);

    upstream.write("NEWS.md", "release notes\n");
    upstream.commit("Unrelated change");

    assert_eq!(check(&ws).status, CheckStatus::UpToDate);
}

#[test]
fn removed_destination_is_content_changed() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(
        &upstream.url(),
        "v0.2",
        &[("playbooks/playbook1.yml", "playbook1.yml")],
    ));
    sync(&ws);

    fs::remove_file(ws.output_path("playbook1.yml")).unwrap();

    let report = check(&ws);
    assert_eq!(report.status, CheckStatus::ContentChanged);
    assert!(report.path.unwrap().ends_with("playbook1.yml"));
}

#[test]
fn resync_after_stale_check_is_up_to_date() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "master", &[("roles/*", "roles")]));
    sync(&ws);

    upstream.remove("roles/dummyrole1");
    upstream.commit("Drop role one");
    assert_eq!(check(&ws).status, CheckStatus::ContentChanged);

    sync(&ws);

    assert_eq!(check(&ws).status, CheckStatus::UpToDate);
    // Glob destinations are only cleaned for current matches
    ws.assert_exists("roles/dummyrole1/tasks/main.yml");
    ws.assert_exists("roles/dummyrole2/tasks/main.yml");
}
