//! Copy directive resolution
//!
//! Turns one [`CopySpec`] into concrete source/destination pairs against a
//! materialized checkout. Nothing here touches the output tree beyond
//! asking whether a destination directory already exists.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use srcsync_fs::{MirrorPath, NormalizedPath, clean_relative};

use crate::config::CopySpec;
use crate::{Error, Result};

const GLOB_METACHARACTERS: [char; 3] = ['*', '?', '['];

/// What a matched source is on disk.
///
/// Symlinks are always [`EntryKind::File`]; they are copied as links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One resolved copy operation with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPair {
    pub src: PathBuf,
    /// Normalized, never carries a trailing separator
    pub dst: PathBuf,
    pub kind: EntryKind,
}

/// Resolve `copy` against the checkout at `repo_root`.
///
/// Pairs come back in sorted source order. A `src` that matches nothing,
/// neither as a pattern nor as a literal path, is [`Error::SourceNotFound`].
pub fn resolve(repo_root: &Path, output_root: &Path, copy: &CopySpec) -> Result<Vec<CopyPair>> {
    let src_rel = clean_relative(&copy.src).ok_or_else(|| {
        Error::malformed(format!("src '{}' must stay inside the repository", copy.src))
    })?;
    let dst_rel = clean_relative(&copy.dst).ok_or_else(|| {
        Error::malformed(format!(
            "dst '{}' must stay inside the output directory",
            copy.dst
        ))
    })?;

    let (matches, from_glob) = expand_source(repo_root, &src_rel)?;

    let base = NormalizedPath::new(output_root).join(&dst_rel).to_native();
    let dst_is_dir = dst_rel.is_empty()
        || copy.dst.ends_with('/')
        || copy.dst.ends_with('\\')
        || matches.len() > 1
        || base.is_dir();

    let mut pairs = Vec::with_capacity(matches.len());
    for src in matches {
        let meta = fs::symlink_metadata(&src).map_err(|e| srcsync_fs::Error::io(&src, e))?;
        let kind = if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        let nest = match kind {
            EntryKind::File => dst_is_dir,
            EntryKind::Directory => from_glob,
        };
        let dst = match src.file_name() {
            Some(name) if nest => base.join(name),
            _ => base.clone(),
        };

        tracing::debug!(
            src = %src.display(),
            dst = %dst.display(),
            ?kind,
            "Resolved copy pair"
        );
        pairs.push(CopyPair {
            dst: NormalizedPath::new(&dst).to_native(),
            src,
            kind,
        });
    }

    Ok(pairs)
}

/// Expand `src_rel` to existing paths under `repo_root`.
///
/// The flag reports whether the matches came from pattern expansion; a
/// pattern that matched nothing and fell back to its literal path does not
/// count.
fn expand_source(repo_root: &Path, src_rel: &str) -> Result<(Vec<PathBuf>, bool)> {
    let literal = if src_rel.is_empty() {
        repo_root.to_path_buf()
    } else {
        repo_root.join(src_rel)
    };

    if src_rel.contains(GLOB_METACHARACTERS) {
        let matches = expand_glob(repo_root, src_rel)?;
        if !matches.is_empty() {
            return Ok((matches, true));
        }
        tracing::debug!(pattern = src_rel, "Pattern matched nothing, trying literal path");
    }

    if fs::symlink_metadata(&literal).is_ok() {
        Ok((vec![literal], false))
    } else {
        Err(Error::SourceNotFound { path: literal })
    }
}

fn expand_glob(repo_root: &Path, src_rel: &str) -> Result<Vec<PathBuf>> {
    let root = Pattern::escape(&repo_root.to_string_lossy());
    let pattern = format!("{}/{}", root.trim_end_matches('/'), src_rel);

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let entries = glob::glob_with(&pattern, options).map_err(|e| Error::Pattern {
        pattern: src_rel.to_string(),
        message: e.msg.to_string(),
    })?;

    let mut matches = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::Io(e.into_error()))?;
        let inside_git_dir = path
            .strip_prefix(repo_root)
            .map(|relative| {
                relative
                    .components()
                    .any(|c| c.as_os_str() == MirrorPath::GitDir.as_str())
            })
            .unwrap_or(false);
        if !inside_git_dir {
            matches.push(path);
        }
    }

    matches.sort();
    matches.dedup();
    Ok(matches)
}
