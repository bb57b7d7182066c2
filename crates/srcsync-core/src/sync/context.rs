//! Per-invocation state shared by sync and check

use std::path::{Path, PathBuf};

use srcsync_fs::NormalizedPath;

use crate::config::Manifest;
use crate::status::StatusRecord;

/// Everything one `sync` or `check` call needs beyond the engine itself.
///
/// Built fresh for every call and dropped at its end.
#[derive(Debug)]
pub struct SyncContext {
    pub fingerprint: String,
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Record being filled by the current sync
    pub status: StatusRecord,
    /// Paths inside the output tree that pre-clean must not remove
    pub protected: Vec<PathBuf>,
}

impl SyncContext {
    pub fn new(manifest: &Manifest, cache_dir: &Path) -> Self {
        let output_dir = manifest.output_dir().to_path_buf();
        let fingerprint = manifest.fingerprint().to_string();

        let mut protected = vec![StatusRecord::location(&output_dir)];
        if let Some(manifest_path) = manifest.path() {
            let manifest_path = NormalizedPath::new(manifest_path);
            if manifest_path.starts_with(&NormalizedPath::new(&output_dir)) {
                protected.push(manifest_path.to_native());
            }
        }

        Self {
            status: StatusRecord::new(fingerprint.clone()),
            fingerprint,
            cache_dir: cache_dir.to_path_buf(),
            output_dir,
            protected,
        }
    }

    pub fn status_file(&self) -> PathBuf {
        StatusRecord::location(&self.output_dir)
    }
}
