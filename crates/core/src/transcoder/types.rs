//! Types for the transcoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bitrate used for MP3 output when the caller does not request one.
pub const DEFAULT_MP3_BITRATE_KBPS: u32 = 320;

/// Target encoding profile for a transcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscodeProfile {
    /// Constant-bitrate MP3 audio via libmp3lame.
    Mp3 { bitrate_kbps: u32 },
    /// H.264 video in an MP4 container with AAC audio. The video bitrate is
    /// optional; when absent the encoder picks its own rate.
    Mp4 { video_bitrate_kbps: Option<u32> },
}

impl TranscodeProfile {
    /// MP3 profile at the requested bitrate, falling back to the default.
    #[must_use]
    pub fn mp3(bitrate_kbps: Option<u32>) -> Self {
        Self::Mp3 {
            bitrate_kbps: bitrate_kbps.unwrap_or(DEFAULT_MP3_BITRATE_KBPS),
        }
    }

    /// MP4 profile with an optional video bitrate.
    #[must_use]
    pub fn mp4(video_bitrate_kbps: Option<u32>) -> Self {
        Self::Mp4 { video_bitrate_kbps }
    }

    /// Returns the file extension for this profile's container.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 { .. } => "mp3",
            Self::Mp4 { .. } => "mp4",
        }
    }
}

/// A transcode job request.
#[derive(Debug, Clone)]
pub struct TranscodeJob {
    /// Unique job ID, used for log correlation.
    pub job_id: String,
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path; the transcoder writes here directly and removes
    /// the file again on any failure.
    pub output_path: PathBuf,
    /// Target encoding profile.
    pub profile: TranscodeProfile,
}

/// Result of a successful transcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeOutput {
    /// Job ID.
    pub job_id: String,
    /// Output file path.
    pub output_path: PathBuf,
    /// Output file size in bytes.
    pub output_size_bytes: u64,
    /// Wall-clock transcode duration in milliseconds.
    pub duration_ms: u64,
}
