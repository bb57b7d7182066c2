//! Materializer trait for version-control backends

use std::path::Path;

use crate::Result;

/// Full hexadecimal identifier of a resolved commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display.
    pub fn short(&self) -> &str {
        Self::abbreviate(&self.0)
    }

    /// Abbreviate a commit id held as plain text, such as one read back
    /// from a status file.
    pub fn abbreviate(hex: &str) -> &str {
        hex.get(..7).unwrap_or(hex)
    }
}

impl From<git2::Oid> for CommitId {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for backends that bring a local directory to a remote revision.
///
/// Implementations must be idempotent: calling `materialize` repeatedly for
/// the same arguments re-fetches and re-checks-out, leaving `local_dir` as a
/// clean working tree with no local modifications.
pub trait Materializer {
    /// Make `local_dir` reflect `revision` of `url` and return its commit.
    ///
    /// `revision` may name a branch, a tag or a commit id.
    fn materialize(&self, url: &str, local_dir: &Path, revision: &str) -> Result<CommitId>;
}

impl<T: Materializer + ?Sized> Materializer for &T {
    fn materialize(&self, url: &str, local_dir: &Path, revision: &str) -> Result<CommitId> {
        (**self).materialize(url, local_dir, revision)
    }
}
