//! Error types for orgman-core.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration could not be assembled at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required key is absent or empty.
    #[error("the variable {key} is not set in the environment but is required")]
    Missing { key: &'static str },

    /// The environment could not be read or a value could not be decoded.
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

/// All errors that can arise from reading or writing team files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (write path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the file path and serde_yaml line context.
    #[error("failed to parse team file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
