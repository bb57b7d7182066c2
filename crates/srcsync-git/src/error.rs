//! Error types for srcsync-git

/// Result type for srcsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while materializing a checkout
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] srcsync_fs::Error),

    #[error("Failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    #[error("Failed to fetch {url}: {message}")]
    FetchFailed { url: String, message: String },

    #[error("Revision '{revision}' not found in {url}")]
    RevisionNotFound { url: String, revision: String },
}
