//! Error types for orgman-sync.

use std::path::PathBuf;

use thiserror::Error;

use orgman_core::{ConfigError, StoreError};
use orgman_provider::ProviderError;

/// All errors that abort an export, apply or publish run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading or writing team files failed.
    #[error("team store error: {0}")]
    Store(#[from] StoreError),

    /// A setting needed for this step is missing.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The provider client could not be built.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A version-control command could not be started.
    #[error("failed to run `{command}`: {source}")]
    Command {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
