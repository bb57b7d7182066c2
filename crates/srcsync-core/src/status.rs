//! Persisted provenance record for an output tree

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use srcsync_fs::{MirrorPath, NormalizedPath, io};
use srcsync_git::CommitId;

use crate::Result;

/// What the last successful sync wrote, and from which commits.
///
/// Stored as YAML at `<output>/.srcsync-status.yml` and replaced wholesale
/// by every sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// `sha256:<hex>` of the manifest bytes the sync ran with
    pub manifest_fingerprint: String,

    /// When the sync finished. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,

    /// Absolute destination path to the commit id it was copied from
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
}

impl StatusRecord {
    pub fn new(manifest_fingerprint: impl Into<String>) -> Self {
        Self {
            manifest_fingerprint: manifest_fingerprint.into(),
            synced_at: None,
            paths: BTreeMap::new(),
        }
    }

    /// Location of the status file for `output_dir`.
    pub fn location(output_dir: &Path) -> PathBuf {
        output_dir.join(MirrorPath::StatusFile.as_str())
    }

    /// Load the record from `output_dir`.
    ///
    /// Returns `Ok(None)` when no status file exists.
    pub fn load(output_dir: &Path) -> Result<Option<Self>> {
        let path = NormalizedPath::new(Self::location(output_dir));
        match io::read_locked(&path)? {
            Some(content) => Ok(Some(serde_yaml::from_str(&content)?)),
            None => Ok(None),
        }
    }

    /// Atomically write the record into `output_dir`, returning the file path.
    pub fn save(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = Self::location(output_dir);
        let content = serde_yaml::to_string(self)?;
        io::write_atomic(&NormalizedPath::new(&path), content.as_bytes())?;
        Ok(path)
    }

    /// Record that `dst` was written from `commit`.
    pub fn record(&mut self, dst: &Path, commit: &CommitId) {
        self.paths.insert(key(dst), commit.as_str().to_string());
    }

    /// Commit id recorded for `dst`, if any.
    pub fn commit_for(&self, dst: &Path) -> Option<&str> {
        self.paths.get(&key(dst)).map(String::as_str)
    }

    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }
}

fn key(path: &Path) -> String {
    NormalizedPath::new(path).as_str().to_string()
}
