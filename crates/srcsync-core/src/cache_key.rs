//! Repository cache key derivation
//!
//! Maps a repository URL to a relative path under the cache root. Keys nest
//! by host and organisation so checkouts from the same host share a subtree,
//! and access-scheme differences (`https://` vs `git@host:`) collapse to the
//! same key.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Filesystem-safe relative path identifying a repository's checkout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Location of the checkout for this key under `cache_dir`.
    pub fn path_in(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(&self.0)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derive the cache key for `url`.
///
/// Normalization, in order:
///
/// 1. strip a `<scheme>://` prefix
/// 2. strip one leading and one trailing `/`
/// 3. strip a trailing `.git`
/// 4. strip a `<user>@` prefix appearing before the first `/` or `:`
/// 5. replace the first `:` with `/`
///
/// Empty and `.` segments are then dropped. A `..` segment, or nothing left
/// at all, is a [`Error::MalformedSource`].
///
/// ```
/// use srcsync_core::cache_key::derive_cache_key;
///
/// let key = derive_cache_key("git@github.com:org/repo.git").unwrap();
/// assert_eq!(key.as_str(), "github.com/org/repo");
/// ```
pub fn derive_cache_key(url: &str) -> Result<CacheKey> {
    let mut path = url.trim();

    if let Some((_, rest)) = path.split_once("://") {
        path = rest;
    }
    path = path.strip_prefix('/').unwrap_or(path);
    path = path.strip_suffix('/').unwrap_or(path);
    path = path.strip_suffix(".git").unwrap_or(path);

    let boundary = path.find(['/', ':']).unwrap_or(path.len());
    if let Some(at) = path[..boundary].find('@') {
        path = &path[at + 1..];
    }

    let replaced = path.replacen(':', "/", 1);

    let mut segments = Vec::new();
    for segment in replaced.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(Error::malformed(format!(
                    "repository URL '{}' climbs out of the cache directory",
                    url
                )));
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(Error::malformed(format!(
            "repository URL '{}' does not name a repository",
            url
        )));
    }

    Ok(CacheKey(segments.join("/")))
}
