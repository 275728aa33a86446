//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::extractor::ResolvedItem;

/// Supported output containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Mp3,
    Mp4,
}

impl OutputFormat {
    /// Parses a user-supplied format string, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }

    /// Returns the file extension for this format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
        }
    }

    /// Provider-side quality selector: audio output wants the best
    /// audio-only source, video output the best combined stream.
    #[must_use]
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Mp3 => "bestaudio/best",
            Self::Mp4 => "bestvideo+bestaudio/best",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A raw media request as submitted by a caller.
///
/// Immutable once submitted. The format arrives as the caller typed it and
/// is validated before any I/O happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRequest {
    /// URL of the media source.
    pub source_url: String,
    /// Requested output container, e.g. `"mp3"`.
    pub format: String,
    /// Requested quality in kbps; `None` uses the format default.
    pub quality_kbps: Option<u32>,
    /// Directory the output file is written to.
    pub dest_dir: PathBuf,
}

/// A request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidRequest {
    pub source_url: String,
    pub format: OutputFormat,
    pub quality_kbps: Option<u32>,
    pub dest_dir: PathBuf,
}

/// Terminal status of one item's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Success,
    Failed,
}

/// Classification of a recorded failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Extraction,
    Fetch,
    Transcode,
    FileSystem,
    Cancelled,
}

/// A recorded failure, safe to keep after the originating error is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
}

/// The result of running one item through the pipeline.
///
/// Created once per item and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// The item this outcome belongs to.
    pub item: ResolvedItem,
    /// Terminal status.
    pub status: ItemStatus,
    /// Name of the produced file, present on success.
    pub output_filename: Option<String>,
    /// Failure details, present on failure.
    pub error: Option<ErrorRecord>,
}

impl ItemOutcome {
    /// Successful outcome for `item` producing `output_filename`.
    #[must_use]
    pub fn success(item: ResolvedItem, output_filename: String) -> Self {
        Self {
            item,
            status: ItemStatus::Success,
            output_filename: Some(output_filename),
            error: None,
        }
    }

    /// Failed outcome for `item` with the recorded error.
    #[must_use]
    pub fn failed(item: ResolvedItem, error: ErrorRecord) -> Self {
        Self {
            item,
            status: ItemStatus::Failed,
            output_filename: None,
            error: Some(error),
        }
    }

    /// Whether this outcome is a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ItemStatus::Success
    }
}
