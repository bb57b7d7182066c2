//! Tree copy and tree clean primitives
//!
//! Copies preserve symlinks as links (never following them), file
//! permissions, and access/modification times. Directory copies merge into
//! whatever already exists at the destination.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Copy a single file or symlink to `dst`, replacing what is there.
///
/// The destination's parent directory must already exist.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(src).map_err(|e| Error::io(src, e))?;
    if meta.file_type().is_symlink() {
        return copy_symlink(src, dst);
    }

    // fs::copy would write through a symlink sitting at the destination
    if let Ok(existing) = fs::symlink_metadata(dst)
        && existing.file_type().is_symlink()
    {
        fs::remove_file(dst).map_err(|e| Error::io(dst, e))?;
    }

    fs::copy(src, dst).map_err(|e| Error::io(dst, e))?;
    apply_times(dst, &meta)
}

/// Recursively copy the directory `src` into `dst`.
///
/// Entries whose file name appears in `exclude` are skipped at every depth,
/// together with everything beneath them. Returns the number of files and
/// links written.
pub fn copy_tree(src: &Path, dst: &Path, exclude: &[&str]) -> Result<usize> {
    fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;

    let mut copied = 0;
    let mut directories: Vec<(PathBuf, Metadata)> = Vec::new();

    let walker = WalkDir::new(src)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !exclude
                    .iter()
                    .any(|name| entry.file_name() == std::ffi::OsStr::new(name))
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            Error::io(path, e.into())
        })?;

        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if let Ok(existing) = fs::symlink_metadata(&target)
                && !existing.is_dir()
            {
                fs::remove_file(&target).map_err(|e| Error::io(&target, e))?;
            }
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            let meta = entry
                .metadata()
                .map_err(|e| Error::io(entry.path(), e.into()))?;
            directories.push((target, meta));
        } else {
            if let Ok(existing) = fs::symlink_metadata(&target)
                && existing.is_dir()
            {
                fs::remove_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            }
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    // Deepest first, so writing children no longer disturbs a parent's
    // mtime and read-only permissions cannot block the copy.
    for (target, meta) in directories.iter().rev() {
        fs::set_permissions(target, meta.permissions()).map_err(|e| Error::io(target, e))?;
        apply_times(target, meta)?;
    }

    Ok(copied)
}

/// Remove `dir` recursively, except for the paths listed in `keep`.
///
/// When any kept path lies beneath `dir`, the directory itself survives and
/// only the entries around the kept paths are removed.
pub fn clean_tree(dir: &Path, keep: &[PathBuf]) -> Result<()> {
    let guarded = keep
        .iter()
        .any(|kept| kept.starts_with(dir) && kept.as_path() != dir);
    if !guarded {
        return remove_entry(dir);
    }

    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if keep.contains(&path) {
            tracing::debug!(path = %path.display(), "Keeping protected path");
            continue;
        }

        let is_dir = entry
            .file_type()
            .map_err(|e| Error::io(&path, e))?
            .is_dir();
        if is_dir && keep.iter().any(|kept| kept.starts_with(&path)) {
            clean_tree(&path, keep)?;
        } else {
            remove_entry(&path)?;
        }
    }
    Ok(())
}

/// Remove a file, symlink or directory tree.
fn remove_entry(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(|e| Error::io(path, e))?;
    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
    } else {
        fs::remove_file(path).map_err(|e| Error::io(path, e))
    }
}

fn apply_times(path: &Path, meta: &Metadata) -> Result<()> {
    let atime = FileTime::from_last_access_time(meta);
    let mtime = FileTime::from_last_modification_time(meta);
    filetime::set_file_times(path, atime, mtime).map_err(|e| Error::io(path, e))
}

fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link_target = fs::read_link(src).map_err(|e| Error::io(src, e))?;

    if fs::symlink_metadata(dst).is_ok() {
        remove_entry(dst)?;
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(&link_target, dst).map_err(|e| Error::io(dst, e))?;

    #[cfg(windows)]
    {
        let resolved = src
            .parent()
            .map(|parent| parent.join(&link_target))
            .unwrap_or_else(|| link_target.clone());
        let result = if resolved.is_dir() {
            std::os::windows::fs::symlink_dir(&link_target, dst)
        } else {
            std::os::windows::fs::symlink_file(&link_target, dst)
        };
        result.map_err(|e| Error::io(dst, e))?;
    }

    Ok(())
}
