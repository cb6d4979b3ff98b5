//! Error types for hpm-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from hpm-package
    #[error(transparent)]
    Package(#[from] hpm_package::Error),

    /// Error from hpm-tags
    #[error(transparent)]
    Tags(#[from] hpm_tags::Error),

    /// Error from hpm-fs
    #[error(transparent)]
    Fs(#[from] hpm_fs::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
