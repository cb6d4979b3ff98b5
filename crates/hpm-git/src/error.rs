//! Error types for hpm-git

use std::path::PathBuf;

/// Result type for hpm-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hpm-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] hpm_fs::Error),

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },
}
