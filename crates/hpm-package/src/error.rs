//! Error types for hpm-package

use std::path::PathBuf;

/// Result type for hpm-package operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or editing packages
///
/// Problems inside a single config (broken JSON, circular variables) are
/// not errors: they become warnings on the [`PackageRecord`](crate::PackageRecord).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] hpm_fs::Error),

    #[error(transparent)]
    Git(#[from] hpm_git::Error),

    #[error("Failed to serialize package config {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Package config root is not an object: {path}")]
    NotAnObject { path: PathBuf },

    #[error("Packages directory not found: {path}")]
    PackagesDirNotFound { path: PathBuf },

    #[error("Host environment does not define {name}")]
    MissingHostVariable { name: String },

    #[error("Plugin directory does not exist: {path}")]
    PluginDirNotFound { path: PathBuf },

    #[error("Package config already exists: {path}")]
    ConfigExists { path: PathBuf },
}
