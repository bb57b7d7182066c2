//! MirrorEngine implementation
//!
//! The engine materializes every repository of a manifest into the cache,
//! resolves the copy directives against those checkouts, and then either
//! applies them to the output tree (`sync`) or compares them with the
//! persisted status record (`check`).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use srcsync_git::{CommitId, Materializer};

use super::check::CheckReport;
use super::context::SyncContext;
use crate::Result;
use crate::cache_key::CacheKey;
use crate::config::{Manifest, RepoSpec};
use crate::executor::{CopyExecutor, CopyPlan};
use crate::resolve::resolve;
use crate::status::StatusRecord;

/// A repository as it was materialized for one invocation
#[derive(Debug, Clone, Serialize)]
pub struct SyncedRepo {
    pub label: String,
    pub url: String,
    pub revision: String,
    /// Full commit id the revision resolved to
    pub commit: String,
}

/// Report from a successful sync
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub repos: Vec<SyncedRepo>,
    /// Number of copy pairs applied
    pub copied: usize,
    pub status_file: PathBuf,
}

/// Engine for mirroring repository content into an output tree
///
/// The engine holds only the cache location and the VCS backend; all
/// per-run state lives in a [`SyncContext`] built by each call.
pub struct MirrorEngine<M: Materializer> {
    cache_dir: PathBuf,
    materializer: M,
}

impl<M: Materializer> MirrorEngine<M> {
    pub fn new(cache_dir: impl Into<PathBuf>, materializer: M) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            materializer,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Bring the output tree in line with `manifest`.
    ///
    /// Every repository is materialized and every directive resolved before
    /// the output tree is touched. The status file is only written once all
    /// pairs have been copied.
    ///
    /// # Errors
    ///
    /// Returns an error for unreachable repositories, unknown revisions,
    /// sources that match nothing, and filesystem failures.
    pub fn sync(&self, manifest: &Manifest) -> Result<SyncReport> {
        let mut ctx = SyncContext::new(manifest, &self.cache_dir);

        fs::create_dir_all(&ctx.cache_dir)
            .map_err(|e| srcsync_fs::Error::io(&ctx.cache_dir, e))?;

        let commits = self.materialize_all(manifest, &ctx)?;
        let plan = plan(manifest, &ctx, &commits)?;

        fs::create_dir_all(&ctx.output_dir)
            .map_err(|e| srcsync_fs::Error::io(&ctx.output_dir, e))?;

        let copied = CopyExecutor::new(&ctx.protected).execute(&plan, &mut ctx.status)?;

        ctx.status.synced_at = Some(Utc::now());
        let status_file = ctx.status.save(&ctx.output_dir)?;

        tracing::info!(
            output = %ctx.output_dir.display(),
            copied,
            "Sync complete"
        );

        Ok(SyncReport {
            repos: synced_repos(manifest, &commits),
            copied,
            status_file,
        })
    }

    /// Report whether the output tree is stale, without modifying it.
    ///
    /// Repository checkouts in the cache are still refreshed. Failures to
    /// materialize or resolve are errors, not outcomes.
    pub fn check(&self, manifest: &Manifest) -> Result<CheckReport> {
        let ctx = SyncContext::new(manifest, &self.cache_dir);
        let status_file = ctx.status_file();

        let recorded = match StatusRecord::load(&ctx.output_dir) {
            Ok(Some(recorded)) => recorded,
            Ok(None) => {
                return Ok(CheckReport::no_status_file(
                    status_file,
                    "output has never been synced",
                ));
            }
            Err(e) => {
                tracing::warn!(
                    path = %status_file.display(),
                    error = %e,
                    "Status file is unreadable"
                );
                return Ok(CheckReport::no_status_file(
                    status_file,
                    format!("status file is unreadable: {}", e),
                ));
            }
        };

        if recorded.manifest_fingerprint != ctx.fingerprint {
            return Ok(CheckReport::manifest_changed());
        }

        fs::create_dir_all(&ctx.cache_dir)
            .map_err(|e| srcsync_fs::Error::io(&ctx.cache_dir, e))?;
        let commits = self.materialize_all(manifest, &ctx)?;
        let plan = plan(manifest, &ctx, &commits)?;

        for planned in plan.iter() {
            let dst = &planned.pair.dst;
            let current = planned.commit.as_str();
            match recorded.commit_for(dst) {
                None => {
                    return Ok(CheckReport::content_changed(
                        dst.clone(),
                        format!("{} was not written by the last sync", dst.display()),
                    ));
                }
                Some(previous) if previous != current => {
                    return Ok(CheckReport::content_changed(
                        dst.clone(),
                        format!(
                            "{} moved from {} to {}",
                            planned.repo,
                            CommitId::abbreviate(previous),
                            planned.commit.short()
                        ),
                    ));
                }
                Some(_) => {}
            }
        }

        for destination in recorded.destinations() {
            let path = Path::new(destination);
            if fs::symlink_metadata(path).is_err() {
                return Ok(CheckReport::content_changed(
                    path.to_path_buf(),
                    format!("{} is missing from the output", destination),
                ));
            }
        }

        Ok(CheckReport::up_to_date())
    }

    /// Materialize each distinct checkout once, in manifest order.
    fn materialize_all(
        &self,
        manifest: &Manifest,
        ctx: &SyncContext,
    ) -> Result<HashMap<CacheKey, CommitId>> {
        let mut commits = HashMap::new();
        for repo in manifest.repos() {
            if commits.contains_key(&repo.cache_key) {
                continue;
            }

            let local_dir = repo.cache_key.path_in(&ctx.cache_dir);
            tracing::info!(
                repo = %repo.label,
                revision = %repo.revision,
                "Fetching repository"
            );
            let commit = self
                .materializer
                .materialize(&repo.url, &local_dir, &repo.revision)?;
            commits.insert(repo.cache_key.clone(), commit);
        }
        Ok(commits)
    }
}

/// Resolve every directive of every repository against its checkout.
fn plan(
    manifest: &Manifest,
    ctx: &SyncContext,
    commits: &HashMap<CacheKey, CommitId>,
) -> Result<CopyPlan> {
    let mut plan = CopyPlan::new();
    for repo in manifest.repos() {
        let Some(commit) = commits.get(&repo.cache_key) else {
            continue;
        };
        let repo_root = repo.cache_key.path_in(&ctx.cache_dir);
        for copy in &repo.copies {
            let pairs = resolve(&repo_root, &ctx.output_dir, copy)?;
            tracing::debug!(repo = %repo.label, %copy, pairs = pairs.len(), "Resolved directive");
            plan.extend(&repo.label, commit, pairs);
        }
    }
    plan.nest_files_in_directories();
    Ok(plan)
}

fn synced_repos(manifest: &Manifest, commits: &HashMap<CacheKey, CommitId>) -> Vec<SyncedRepo> {
    manifest
        .repos()
        .iter()
        .filter_map(|repo: &RepoSpec| {
            commits.get(&repo.cache_key).map(|commit| SyncedRepo {
                label: repo.label.clone(),
                url: repo.url.clone(),
                revision: repo.revision.clone(),
                commit: commit.to_string(),
            })
        })
        .collect()
}
