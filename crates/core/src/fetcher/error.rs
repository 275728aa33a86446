//! Error types for the fetcher module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while retrieving media.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Download tool binary not found.
    #[error("download tool not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// The tool ran but reported failure.
    #[error("fetch failed: {reason}")]
    FetchFailed { reason: String },

    /// The tool reported success but the file it named is missing.
    #[error("fetched file missing at reported path: {path}")]
    OutputMissing { path: PathBuf },

    /// Fetch was cancelled.
    #[error("fetch cancelled")]
    Cancelled,

    /// I/O error during the fetch.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Creates a new fetch failed error.
    pub fn fetch_failed(reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            reason: reason.into(),
        }
    }
}
