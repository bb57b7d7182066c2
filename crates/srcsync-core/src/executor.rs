//! Copy executor
//!
//! Applies the resolved pairs of every repository in two passes. The
//! pre-clean pass runs to completion before anything is copied, so a later
//! pair may merge into a directory an earlier pair also writes to.

use std::fs;
use std::path::PathBuf;

use srcsync_fs::MirrorPath;
use srcsync_fs::copy::{clean_tree, copy_file, copy_tree};
use srcsync_git::CommitId;

use crate::Result;
use crate::resolve::{CopyPair, EntryKind};
use crate::status::StatusRecord;

/// A resolved pair together with the commit it is copied from.
#[derive(Debug, Clone)]
pub struct PlannedCopy {
    pub pair: CopyPair,
    pub commit: CommitId,
    /// Label of the repository the source belongs to
    pub repo: String,
}

/// Every pair of one invocation, in manifest order.
#[derive(Debug, Clone, Default)]
pub struct CopyPlan {
    entries: Vec<PlannedCopy>,
}

impl CopyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the pairs resolved for one copy directive.
    pub fn extend(&mut self, repo: &str, commit: &CommitId, pairs: Vec<CopyPair>) {
        self.entries.extend(pairs.into_iter().map(|pair| PlannedCopy {
            pair,
            commit: commit.clone(),
            repo: repo.to_string(),
        }));
    }

    /// Move each file pair whose destination another pair uses as a
    /// directory to `<dst>/<file name>`.
    ///
    /// Resolution only sees directories already on disk; this applies the
    /// same rule to directories the plan itself creates, so the layout does
    /// not depend on what an earlier run left behind.
    pub fn nest_files_in_directories(&mut self) {
        let claimed: Vec<(PathBuf, EntryKind)> = self
            .entries
            .iter()
            .map(|planned| (planned.pair.dst.clone(), planned.pair.kind))
            .collect();

        for (index, planned) in self.entries.iter_mut().enumerate() {
            let pair = &mut planned.pair;
            if pair.kind != EntryKind::File {
                continue;
            }
            let used_as_dir = claimed.iter().enumerate().any(|(other, (dst, kind))| {
                other != index
                    && ((*kind == EntryKind::Directory && *dst == pair.dst)
                        || (*dst != pair.dst && dst.starts_with(&pair.dst)))
            });
            if !used_as_dir {
                continue;
            }
            if let Some(name) = pair.src.file_name() {
                let nested = pair.dst.join(name);
                tracing::debug!(
                    src = %pair.src.display(),
                    dst = %nested.display(),
                    "Destination is a directory in this plan"
                );
                pair.dst = nested;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedCopy> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs a [`CopyPlan`] against the output tree.
pub struct CopyExecutor<'a> {
    /// Paths that survive pre-clean even inside a cleaned directory
    protected: &'a [PathBuf],
}

impl<'a> CopyExecutor<'a> {
    pub fn new(protected: &'a [PathBuf]) -> Self {
        Self { protected }
    }

    /// Pre-clean, then copy, recording each destination into `status`.
    ///
    /// Returns the number of pairs applied. A failure leaves the output tree
    /// partially written and `status` partially filled.
    pub fn execute(&self, plan: &CopyPlan, status: &mut StatusRecord) -> Result<usize> {
        self.pre_clean(plan)?;
        self.copy(plan, status)
    }

    /// Remove existing destinations of directory sources.
    pub fn pre_clean(&self, plan: &CopyPlan) -> Result<()> {
        for planned in plan.iter() {
            let pair = &planned.pair;
            if pair.kind != EntryKind::Directory || self.protected.contains(&pair.dst) {
                continue;
            }
            if fs::symlink_metadata(&pair.dst).is_err() {
                continue;
            }

            tracing::debug!(dst = %pair.dst.display(), "Cleaning destination");
            clean_tree(&pair.dst, self.protected)?;
        }
        Ok(())
    }

    fn copy(&self, plan: &CopyPlan, status: &mut StatusRecord) -> Result<usize> {
        let mut applied = 0;
        for planned in plan.iter() {
            let pair = &planned.pair;
            match pair.kind {
                EntryKind::Directory => {
                    let files = copy_tree(&pair.src, &pair.dst, &[MirrorPath::GitDir.as_str()])?;
                    tracing::debug!(
                        repo = %planned.repo,
                        src = %pair.src.display(),
                        dst = %pair.dst.display(),
                        files,
                        "Copied directory"
                    );
                }
                EntryKind::File => {
                    if let Some(parent) = pair.dst.parent() {
                        fs::create_dir_all(parent)
                            .map_err(|e| srcsync_fs::Error::io(parent, e))?;
                    }
                    copy_file(&pair.src, &pair.dst)?;
                    tracing::debug!(
                        repo = %planned.repo,
                        src = %pair.src.display(),
                        dst = %pair.dst.display(),
                        "Copied file"
                    );
                }
            }
            status.record(&pair.dst, &planned.commit);
            applied += 1;
        }
        Ok(applied)
    }
}
