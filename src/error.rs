//! Error types for the suggestion engine
//!
//! Only the crate's own edges (configuration, local persistence) surface
//! typed errors. Backend fetch and resolution failures are recovered
//! inside the session and never reach the host as hard errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by configuration loading and local storage.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading or writing a local file failed.
    #[error("storage I/O failed for {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted recent-search file could not be decoded.
    #[error("failed to decode persisted data: {0}")]
    Decode(#[from] serde_json::Error),

    /// A settings file could not be parsed.
    #[error("failed to parse settings file: {0}")]
    Settings(#[from] serde_yaml::Error),
}

impl SuggestError {
    /// Build a storage error carrying the offending path.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}
