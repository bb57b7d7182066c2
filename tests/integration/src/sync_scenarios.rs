//! End-to-end sync scenarios against real upstream repositories
//!
//! Every test builds a fresh upstream with [`roles_upstream`], writes a
//! manifest into a [`TestWorkspace`] and syncs it with the git-backed
//! engine.

use pretty_assertions::assert_eq;
use rstest::rstest;
use srcsync_core::{Manifest, MirrorEngine, SyncReport};
use srcsync_fs::MirrorPath;
use srcsync_git::GitMaterializer;
use srcsync_test_utils::git::{UpstreamRepo, roles_upstream};
use srcsync_test_utils::workspace::{TestWorkspace, manifest_yaml};

fn sync(ws: &TestWorkspace) -> SyncReport {
    let manifest = Manifest::load(&ws.manifest_path(), None).unwrap();
    MirrorEngine::new(ws.cache_dir(), GitMaterializer::new())
        .sync(&manifest)
        .unwrap()
}

fn sync_pairs(upstream: &UpstreamRepo, version: &str, pairs: &[(&str, &str)]) -> TestWorkspace {
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), version, pairs));
    sync(&ws);
    ws
}

// =============================================================================
// Single files
// =============================================================================

#[rstest]
#[case("playbook1.yml", "playbook1.yml")]
#[case("playbooks/", "playbooks/playbook1.yml")]
#[case("", "playbook1.yml")]
#[case("plays/main.yml", "plays/main.yml")]
fn file_from_tag(#[case] dst: &str, #[case] expected: &str) {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "v0.2", &[("playbooks/playbook1.yml", dst)]);

    ws.assert_file_contains(expected, "hosts: all");
}

#[test]
fn glob_of_files_into_directory() {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "v0.2", &[("playbooks/*.yml", "plays/")]);

    ws.assert_exists("plays/playbook1.yml");
}

// =============================================================================
// Directories
// =============================================================================

#[test]
fn directory_from_tag_excludes_later_commits() {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "v0.2", &[("roles", "roles")]);

    ws.assert_exists("roles/dummyrole1/tasks/main.yml");
    ws.assert_exists("roles/dummyrole2/tasks/main.yml");
    ws.assert_missing("roles/dummyrole3");
}

#[test]
fn directory_from_branch_includes_tip() {
    let (upstream, history) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(&upstream.url(), "master", &[("roles", "roles")]));

    let report = sync(&ws);

    assert_eq!(report.repos[0].commit, history.head);
    ws.assert_exists("roles/dummyrole3/tasks/main.yml");
}

#[rstest]
#[case("roles", "roles2")]
#[case("roles/", "roles2")]
#[case("roles", "roles2/")]
fn literal_directory_is_renamed(#[case] src: &str, #[case] dst: &str) {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "v0.2", &[(src, dst)]);

    ws.assert_exists("roles2/dummyrole1/tasks/main.yml");
    ws.assert_missing("roles2/roles");
    ws.assert_missing("roles");
}

#[test]
fn literal_directory_into_output_root() {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "v0.2", &[("roles", "")]);

    ws.assert_exists("dummyrole1/tasks/main.yml");
    ws.assert_exists("dummyrole2/tasks/main.yml");
    ws.assert_exists("manifest.yml");
    ws.assert_exists(MirrorPath::StatusFile.as_str());
}

#[test]
fn glob_of_directories_keeps_names() {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "v0.2", &[("roles/*", "roles")]);

    ws.assert_exists("roles/dummyrole1/tasks/main.yml");
    ws.assert_exists("roles/dummyrole2/tasks/main.yml");
}

#[test]
fn subdirectory_is_renamed() {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "v0.2", &[("roles/dummyrole1", "role1")]);

    ws.assert_file_contains("role1/tasks/main.yml", "role1");
    ws.assert_missing("role1/dummyrole1");
}

#[test]
fn whole_repository_without_git_metadata() {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "v0.2", &[("./", "vendor/output")]);

    ws.assert_file_contains("vendor/output/README.md", "roles upstream");
    ws.assert_exists("vendor/output/roles/dummyrole1/tasks/main.yml");
    ws.assert_missing("vendor/output/.git");
}

#[test]
fn two_directories_merge_into_one() {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(
        &upstream,
        "v0.2",
        &[("roles", "merged"), ("playbooks", "merged")],
    );

    ws.assert_exists("merged/dummyrole1/tasks/main.yml");
    ws.assert_exists("merged/playbook1.yml");
}

#[test]
fn two_repositories_merge_into_one() {
    let (roles, _) = roles_upstream();
    let other = UpstreamRepo::new();
    other.write("extra/tool.yml", "tool: true\n");
    other.commit("Add tool");

    let ws = TestWorkspace::new();
    ws.write_manifest(&format!(
        "output_dir: ./\nrepos:\n\
         - url: '{}'\n  version: v0.2\n  copy:\n  - src: roles\n    dst: merged\n\
         - url: '{}'\n  copy:\n  - src: extra\n    dst: merged\n",
        roles.url(),
        other.url()
    ));

    let report = sync(&ws);

    assert_eq!(report.repos.len(), 2);
    ws.assert_exists("merged/dummyrole1/tasks/main.yml");
    ws.assert_file_contains("merged/tool.yml", "tool: true");
}

// =============================================================================
// Re-syncs
// =============================================================================

#[test]
fn resync_is_idempotent() {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "v0.2", &[("roles", "roles2")]);

    sync(&ws);
    sync(&ws);

    ws.assert_exists("roles2/dummyrole1/tasks/main.yml");
    ws.assert_missing("roles2/roles");
    ws.assert_missing("roles2/roles2");
}

#[test]
fn upstream_removals_disappear() {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "master", &[("roles", "roles2")]);
    ws.assert_exists("roles2/dummyrole2/tasks/main.yml");

    upstream.remove("roles/dummyrole2");
    upstream.commit("Drop role two");
    sync(&ws);

    ws.assert_missing("roles2/dummyrole2");
    ws.assert_exists("roles2/dummyrole1/tasks/main.yml");
}

#[test]
fn moving_back_to_tag_removes_newer_content() {
    let (upstream, history) = roles_upstream();
    let ws = sync_pairs(&upstream, "master", &[("roles", "roles")]);
    ws.assert_exists("roles/dummyrole3/tasks/main.yml");

    ws.write_manifest(&manifest_yaml(&upstream.url(), "v0.2", &[("roles", "roles")]));
    let report = sync(&ws);

    assert_eq!(report.repos[0].commit, history.tagged);
    ws.assert_missing("roles/dummyrole3");
}

#[test]
fn local_edits_in_directory_destination_are_replaced() {
    let (upstream, _) = roles_upstream();
    let ws = sync_pairs(&upstream, "v0.2", &[("roles", "roles")]);
    std::fs::write(ws.output_path("roles/local-notes.txt"), "scratch").unwrap();

    sync(&ws);

    ws.assert_missing("roles/local-notes.txt");
}

#[test]
fn missing_source_fails_without_status_file() {
    let (upstream, _) = roles_upstream();
    let ws = TestWorkspace::new();
    ws.write_manifest(&manifest_yaml(
        &upstream.url(),
        "v0.2",
        &[("roles", "roles"), ("roles/dummyrole3", "role3")],
    ));

    let manifest = Manifest::load(&ws.manifest_path(), None).unwrap();
    let result = MirrorEngine::new(ws.cache_dir(), GitMaterializer::new()).sync(&manifest);

    assert!(matches!(result, Err(srcsync_core::Error::SourceNotFound { .. })));
    ws.assert_missing(MirrorPath::StatusFile.as_str());
    ws.assert_missing("roles");
}
