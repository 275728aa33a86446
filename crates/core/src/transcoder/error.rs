//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a transcode.
#[derive(Debug, Error)]
pub enum TranscoderError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Input file not found.
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Output directory does not exist and could not be created.
    #[error("failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// Transcode process failed.
    #[error("transcode failed: {reason}")]
    TranscodeFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Transcode timed out.
    #[error("transcode timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Job was cancelled.
    #[error("transcode cancelled")]
    Cancelled,

    /// I/O error during the transcode.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscoderError {
    /// Creates a new transcode failed error with captured stderr output.
    pub fn transcode_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::TranscodeFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Human-readable diagnostic, including tool stderr when captured.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match self {
            Self::TranscodeFailed {
                reason,
                stderr: Some(stderr),
            } if !stderr.is_empty() => format!("{reason}: {}", stderr.trim()),
            other => other.to_string(),
        }
    }
}
