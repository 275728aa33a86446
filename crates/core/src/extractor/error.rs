//! Error types for the extractor module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during metadata resolution.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// Extraction tool binary not found.
    #[error("extraction tool not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// The tool ran but reported failure.
    #[error("extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    /// The tool produced output we could not parse.
    #[error("failed to parse extractor output: {reason}")]
    ParseError { reason: String },

    /// I/O error talking to the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractorError {
    /// Creates a new extraction failed error.
    pub fn extraction_failed(reason: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            reason: reason.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Self::ParseError {
            reason: reason.into(),
        }
    }
}
