//! Well-known file and directory names.

use std::path::Path;

/// Names srcsync reads or writes at fixed locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorPath {
    /// Status record written at the output root after a successful sync
    StatusFile,
    /// Version-control metadata directory, never copied into the output
    GitDir,
    /// Manifest file name used when none is given
    DefaultManifest,
    /// Subdirectory of the platform cache dir holding repository checkouts
    CacheDirName,
}

impl MirrorPath {
    /// Get the string representation of the path.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StatusFile => ".srcsync-status.yml",
            Self::GitDir => ".git",
            Self::DefaultManifest => "manifest.yml",
            Self::CacheDirName => "srcsync",
        }
    }
}

impl AsRef<Path> for MirrorPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for MirrorPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for MirrorPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
