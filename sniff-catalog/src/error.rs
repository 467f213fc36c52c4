//! Error types for the sniff-catalog crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a catalog.
///
/// All of these are fatal to a scan: a catalog that cannot be loaded
/// completely is never used partially.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog file {file}: {source}")]
    Parse {
        file: String,
        source: serde_yaml::Error,
    },

    #[error("Invalid catalog entry '{entry}': {reason}")]
    Invalid { entry: String, reason: String },
}

impl CatalogError {
    pub(crate) fn invalid(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::Invalid {
            entry: entry.into(),
            reason: reason.into(),
        }
    }
}
