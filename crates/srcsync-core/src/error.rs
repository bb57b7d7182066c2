//! Error types for srcsync-core

use std::path::PathBuf;

/// Result type for srcsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while syncing or checking an output tree
///
/// Stale output is not an error; `check` reports it through
/// [`CheckStatus`](crate::CheckStatus).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A URL normalizes to nothing, or a manifest field is structurally invalid
    #[error("Malformed source: {message}")]
    MalformedSource { message: String },

    /// A copy source matched no entry in the repository checkout
    #[error("Source not found in repository: {path}")]
    SourceNotFound { path: PathBuf },

    /// A copy source is not a valid glob pattern
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    // Transparent wrappers for underlying crate errors
    /// Materialization failure, surfaced verbatim
    #[error(transparent)]
    Vcs(#[from] srcsync_git::Error),

    /// Filesystem error from srcsync-fs
    #[error(transparent)]
    Fs(#[from] srcsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSource {
            message: message.into(),
        }
    }
}
