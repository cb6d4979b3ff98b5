//! Error types for hpm-tags

/// Result type for hpm-tags operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching or caching tags
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] hpm_fs::Error),

    /// The hosting API answered 403. Nothing more should be requested until
    /// the limit resets.
    #[error("Fetch failed! Rate limited while fetching tags from '{url}'")]
    RateLimited { url: String },

    /// The host could not be reached.
    #[error("Fetch failed! Unable to establish connection to {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Failed to build HTTP client: {message}")]
    Client { message: String },

    #[error("Background tag fetch stopped unexpectedly")]
    WorkerPanicked,
}

impl Error {
    /// Whether this error ends a batch of fetches.
    pub fn aborts_batch(&self) -> bool {
        matches!(self, Error::RateLimited { .. } | Error::Connection { .. })
    }
}
