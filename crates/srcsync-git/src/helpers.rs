//! Shared git2 helper functions for materializing a checkout
//!
//! Each step of bringing a cache directory to a revision is a separate
//! function so the steps can be tested in isolation.

use std::fs;
use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{Commit, FetchOptions, FetchPrune, Repository};

use crate::{Error, Result};

/// Refspecs fetched on every materialization: all branches as remote
/// tracking refs, and all tags.
const FETCH_REFSPECS: [&str; 2] = [
    "+refs/heads/*:refs/remotes/origin/*",
    "+refs/tags/*:refs/tags/*",
];

/// Open the repository at `local_dir`, cloning `url` into it when absent.
///
/// A directory that exists but is not a repository (for example after an
/// interrupted clone) is removed and cloned afresh. The returned flag is
/// `true` when a clone happened.
pub fn open_or_clone(url: &str, local_dir: &Path) -> Result<(Repository, bool)> {
    if local_dir.exists() {
        match Repository::open(local_dir) {
            Ok(repo) => {
                tracing::debug!(path = %local_dir.display(), "Re-using repository cache");
                return Ok((repo, false));
            }
            Err(e) => {
                tracing::warn!(
                    path = %local_dir.display(),
                    error = %e,
                    "Cache directory is not a git repository, cloning again"
                );
                fs::remove_dir_all(local_dir)
                    .map_err(|e| srcsync_fs::Error::io(local_dir, e))?;
            }
        }
    }

    if let Some(parent) = local_dir.parent() {
        fs::create_dir_all(parent).map_err(|e| srcsync_fs::Error::io(parent, e))?;
    }

    tracing::info!(url, path = %local_dir.display(), "Cloning repository");
    let repo = RepoBuilder::new()
        .clone(url, local_dir)
        .map_err(|e| Error::CloneFailed {
            url: url.to_string(),
            message: e.message().to_string(),
        })?;

    Ok((repo, true))
}

/// Point `origin` at `url` and fetch every branch and tag from it.
pub fn fetch_origin(repo: &Repository, url: &str) -> Result<()> {
    match repo.find_remote("origin") {
        Ok(remote) if remote.url() == Some(url) => {}
        Ok(_) => repo.remote_set_url("origin", url)?,
        Err(_) => {
            repo.remote("origin", url)?;
        }
    }

    let mut remote = repo.find_remote("origin")?;
    let mut options = FetchOptions::new();
    options.prune(FetchPrune::On);

    tracing::debug!(url, "Fetching remotes");
    remote
        .fetch(&FETCH_REFSPECS, Some(&mut options), None)
        .map_err(|e| Error::FetchFailed {
            url: url.to_string(),
            message: e.message().to_string(),
        })?;

    Ok(())
}

/// Resolve `revision` to a commit.
///
/// A remote branch `origin/<revision>` wins over anything else, since the
/// local branch of the same name may lag behind. Otherwise the revision is
/// handed to rev-parse, which covers tags and full or abbreviated commit ids.
pub fn resolve_revision<'r>(
    repo: &'r Repository,
    url: &str,
    revision: &str,
) -> Result<Commit<'r>> {
    let remote_branch = format!("refs/remotes/origin/{}", revision);
    if let Ok(reference) = repo.find_reference(&remote_branch) {
        tracing::debug!(revision, "Resolved revision as remote branch");
        return Ok(reference.peel_to_commit()?);
    }

    repo.revparse_single(revision)
        .and_then(|object| object.peel_to_commit())
        .map_err(|_| Error::RevisionNotFound {
            url: url.to_string(),
            revision: revision.to_string(),
        })
}

/// Force the working tree to `commit` and detach HEAD there.
///
/// Local modifications, untracked and ignored files are discarded.
pub fn checkout_detached(repo: &Repository, commit: &Commit<'_>) -> Result<()> {
    let mut builder = CheckoutBuilder::new();
    builder.force().remove_untracked(true).remove_ignored(true);

    repo.checkout_tree(commit.as_object(), Some(&mut builder))?;
    repo.set_head_detached(commit.id())?;

    Ok(())
}
