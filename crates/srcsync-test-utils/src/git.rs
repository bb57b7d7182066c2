//! Upstream git repositories for materialization and sync tests.
//!
//! Every fixture is a real repository on the local filesystem, so its path
//! doubles as a clone URL and no network access is needed.

use std::fs;
use std::path::Path;

use git2::{Commit, IndexAddOption, ObjectType, Repository, RepositoryInitOptions};
use tempfile::TempDir;

/// A temporary non-bare repository acting as a remote.
///
/// The default branch is always `master`, independent of the host's
/// `init.defaultBranch` setting.
pub struct UpstreamRepo {
    temp_dir: TempDir,
    repo: Repository,
}

impl Default for UpstreamRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamRepo {
    /// Initialise an empty repository with a committer identity configured.
    ///
    /// # Panics
    /// Panics if the repository cannot be created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("master");
        let repo = Repository::init_opts(temp_dir.path(), &opts).unwrap_or_else(|e| {
            panic!(
                "UpstreamRepo::new: failed to init repository at {}: {e}",
                temp_dir.path().display()
            )
        });

        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }

        Self { temp_dir, repo }
    }

    /// Filesystem path of the working tree.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// URL to clone this repository from.
    pub fn url(&self) -> String {
        self.path().to_string_lossy().into_owned()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("UpstreamRepo::write: {}: {e}", path.display()));
    }

    /// Remove a file or directory from the working tree.
    pub fn remove(&self, relative: &str) {
        let path = self.path().join(relative);
        if path.is_dir() {
            fs::remove_dir_all(&path).unwrap();
        } else {
            fs::remove_file(&path).unwrap();
        }
    }

    /// Stage every change (including deletions) and commit on HEAD.
    ///
    /// Returns the new commit id as hex.
    pub fn commit(&self, message: &str) -> String {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let signature = self.repo.signature().unwrap();

        let parents: Vec<Commit<'_>> = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

        self.repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parent_refs,
            )
            .unwrap_or_else(|e| panic!("UpstreamRepo::commit: {e}"))
            .to_string()
    }

    /// Create a lightweight tag at HEAD.
    pub fn tag(&self, name: &str) {
        let target = self.repo.head().unwrap().peel(ObjectType::Commit).unwrap();
        self.repo.tag_lightweight(name, &target, false).unwrap();
    }

    /// Create a branch at HEAD without switching to it.
    pub fn branch(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.branch(name, &head, false).unwrap();
    }

    /// Current HEAD commit id as hex.
    pub fn head_id(&self) -> String {
        self.repo
            .head()
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .id()
            .to_string()
    }
}

/// Commit ids recorded while building [`roles_upstream`].
#[derive(Debug, Clone)]
pub struct RolesHistory {
    /// Commit tagged `v0.2`: one playbook and two roles
    pub tagged: String,
    /// Tip of `master`: adds a third role
    pub head: String,
}

/// Build an upstream with a playbook and role directories.
///
/// Layout at tag `v0.2`:
///
/// ```text
/// playbooks/playbook1.yml
/// roles/dummyrole1/tasks/main.yml
/// roles/dummyrole2/tasks/main.yml
/// ```
///
/// `master` adds `roles/dummyrole3/tasks/main.yml` on top.
pub fn roles_upstream() -> (UpstreamRepo, RolesHistory) {
    let upstream = UpstreamRepo::new();
    upstream.write("README.md", "# roles upstream\n");
    upstream.write("playbooks/playbook1.yml", "- hosts: all\n  roles: [dummyrole1]\n");
    upstream.write("roles/dummyrole1/tasks/main.yml", "- debug: msg=role1\n");
    upstream.write("roles/dummyrole2/tasks/main.yml", "- debug: msg=role2\n");
    let tagged = upstream.commit("Add playbook and two roles");
    upstream.tag("v0.2");

    upstream.write("roles/dummyrole3/tasks/main.yml", "- debug: msg=role3\n");
    let head = upstream.commit("Add third role");

    (upstream, RolesHistory { tagged, head })
}
