//! git2-backed materializer

use std::path::Path;

use crate::helpers::{checkout_detached, fetch_origin, open_or_clone, resolve_revision};
use crate::{CommitId, Materializer, Result};

/// Materializes revisions with libgit2.
///
/// No credential callbacks are installed, so remotes must be reachable
/// without interactive authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitMaterializer;

impl GitMaterializer {
    pub fn new() -> Self {
        Self
    }
}

impl Materializer for GitMaterializer {
    fn materialize(&self, url: &str, local_dir: &Path, revision: &str) -> Result<CommitId> {
        let (repo, cloned) = open_or_clone(url, local_dir)?;
        // A fresh clone only follows tags reachable from the default branch
        fetch_origin(&repo, url)?;
        tracing::debug!(url, cloned, "Remote refs up to date");

        let commit = resolve_revision(&repo, url, revision)?;
        checkout_detached(&repo, &commit)?;

        let id = CommitId::from(commit.id());
        tracing::info!(url, revision, commit = %id, "Checked out revision");
        Ok(id)
    }
}
