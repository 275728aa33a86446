//! Error types for the pipeline module.

use std::path::PathBuf;
use thiserror::Error;

use crate::extractor::ExtractorError;
use crate::fetcher::FetchError;
use crate::sidecar::SidecarError;
use crate::transcoder::TranscoderError;

use super::types::{ErrorKind, ErrorRecord};

/// Errors that can occur while driving an item through the pipeline.
///
/// These never cross the pipeline boundary; they are converted into an
/// [`ErrorRecord`](super::types::ErrorRecord) on the item's outcome.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request was rejected before any I/O.
    #[error("invalid request: {reason}")]
    Validation { reason: String },

    /// Metadata resolution failed.
    #[error(transparent)]
    Extraction(#[from] ExtractorError),

    /// Media retrieval failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Transcode failed.
    #[error(transparent)]
    Transcode(#[from] TranscoderError),

    /// Sidecar write failed.
    #[error(transparent)]
    Sidecar(#[from] SidecarError),

    /// Directory or file manipulation failed.
    #[error("filesystem error at {path}: {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The run was cancelled between steps.
    #[error("run cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Creates a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Classification for the outcome record. Cancellation surfacing
    /// through a collaborator is reported as cancellation, not as that
    /// collaborator's failure class.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Extraction(_) => ErrorKind::Extraction,
            Self::Fetch(FetchError::Cancelled) => ErrorKind::Cancelled,
            Self::Fetch(_) => ErrorKind::Fetch,
            Self::Transcode(TranscoderError::Cancelled) => ErrorKind::Cancelled,
            Self::Transcode(_) => ErrorKind::Transcode,
            Self::Sidecar(_) | Self::FileSystem { .. } => ErrorKind::FileSystem,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Converts into the immutable record stored on an outcome.
    #[must_use]
    pub fn record(&self) -> ErrorRecord {
        let message = match self {
            // Transcode diagnostics carry the tool's stderr when captured.
            Self::Transcode(err) => err.diagnostic(),
            other => other.to_string(),
        };
        ErrorRecord {
            kind: self.kind(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            PipelineError::validation("bad format").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            PipelineError::Fetch(FetchError::fetch_failed("net down")).kind(),
            ErrorKind::Fetch
        );
        assert_eq!(
            PipelineError::Fetch(FetchError::Cancelled).kind(),
            ErrorKind::Cancelled
        );
        assert_eq!(
            PipelineError::Transcode(TranscoderError::Cancelled).kind(),
            ErrorKind::Cancelled
        );
        assert_eq!(PipelineError::Cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_record_includes_transcode_stderr() {
        let err = PipelineError::Transcode(TranscoderError::transcode_failed(
            "ffmpeg exited with code: Some(1)",
            Some("Invalid data found when processing input".to_string()),
        ));
        let record = err.record();
        assert_eq!(record.kind, ErrorKind::Transcode);
        assert!(record.message.contains("Invalid data found"));
    }
}
