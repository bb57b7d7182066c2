//! Check outcome types
//!
//! A stale output tree is a normal result of `check`, not an error.

use std::path::PathBuf;

use serde::Serialize;

/// Outcome of comparing an output tree against its manifest and upstreams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckStatus {
    /// Output matches the manifest and every upstream revision
    UpToDate,
    /// The output directory has never been synced
    NoStatusFile,
    /// The manifest changed since the last sync
    ManifestChanged,
    /// An upstream revision moved or a destination went missing
    ContentChanged,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpToDate => "up-to-date",
            Self::NoStatusFile => "no-status-file",
            Self::ManifestChanged => "manifest-changed",
            Self::ContentChanged => "content-changed",
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report from a check
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub status: CheckStatus,
    /// Human-readable explanation
    pub reason: String,
    /// The destination or status file the outcome is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl CheckReport {
    pub fn up_to_date() -> Self {
        Self {
            status: CheckStatus::UpToDate,
            reason: "output is up to date".to_string(),
            path: None,
        }
    }

    pub fn no_status_file(status_file: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::NoStatusFile,
            reason: reason.into(),
            path: Some(status_file),
        }
    }

    pub fn manifest_changed() -> Self {
        Self {
            status: CheckStatus::ManifestChanged,
            reason: "manifest changed since the last sync".to_string(),
            path: None,
        }
    }

    pub fn content_changed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::ContentChanged,
            reason: reason.into(),
            path: Some(path),
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        self.status == CheckStatus::UpToDate
    }
}
