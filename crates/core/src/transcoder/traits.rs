//! Trait definitions for the transcoder module.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::TranscoderError;
use super::types::{TranscodeJob, TranscodeOutput};

/// A transcoder that converts media files to a target profile.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Transcodes a media file according to the job specification.
    ///
    /// On failure or cancellation no file is left at the job's output path.
    async fn transcode(
        &self,
        job: TranscodeJob,
        cancel: &CancellationToken,
    ) -> Result<TranscodeOutput, TranscoderError>;

    /// Validates that the transcoder is properly configured and ready.
    async fn validate(&self) -> Result<(), TranscoderError>;
}
