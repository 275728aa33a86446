//! Transcoder module for converting fetched media to the target container.
//!
//! This module provides the `Transcoder` trait and the FFmpeg-backed
//! implementation used in production.
//!
//! # Features
//!
//! - Constant-bitrate MP3 audio output (libmp3lame)
//! - MP4 video output (libx264 + AAC audio)
//! - Diagnostic capture from the tool's error stream
//! - Timeout and cancellation with subprocess termination
//!
//! # Example
//!
//! ```ignore
//! use tapedeck_core::transcoder::{FfmpegTranscoder, Transcoder, TranscodeJob, TranscodeProfile};
//!
//! let transcoder = FfmpegTranscoder::with_defaults();
//!
//! // Validate ffmpeg is available
//! transcoder.validate().await?;
//!
//! let job = TranscodeJob {
//!     job_id: "job-1".to_string(),
//!     input_path: PathBuf::from("/tmp/.tapedeck-abc.webm"),
//!     output_path: PathBuf::from("/out/Song.mp3"),
//!     profile: TranscodeProfile::mp3(Some(192)),
//! };
//!
//! let result = transcoder.transcode(job, &cancel).await?;
//! println!("Transcoded in {} ms", result.duration_ms);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::TranscoderConfig;
pub use error::TranscoderError;
pub use ffmpeg::FfmpegTranscoder;
pub use traits::Transcoder;
pub use types::{TranscodeJob, TranscodeOutput, TranscodeProfile, DEFAULT_MP3_BITRATE_KBPS};
