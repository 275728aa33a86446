//! Mock transcoder for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::transcoder::{TranscodeJob, TranscodeOutput, Transcoder, TranscoderError};

/// Mock implementation of the Transcoder trait.
///
/// Writes a real output file on success so finalization invariants are
/// observable; on failure no file is created, matching the production
/// contract. Controllable behavior:
/// - Inject a one-shot error
/// - Persistently fail jobs whose output filename contains a marker
/// - Record jobs for assertions
#[derive(Debug)]
pub struct MockTranscoder {
    jobs: Arc<RwLock<Vec<TranscodeJob>>>,
    next_error: Arc<RwLock<Option<TranscoderError>>>,
    fail_marker: Arc<RwLock<Option<String>>>,
    output_payload: Arc<RwLock<Vec<u8>>>,
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscoder {
    /// Create a new mock transcoder.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            fail_marker: Arc::new(RwLock::new(None)),
            output_payload: Arc::new(RwLock::new(b"transcoded media".to_vec())),
        }
    }

    /// Configure the next transcode to fail with the given error.
    pub async fn set_next_error(&self, error: TranscoderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Fail every job whose output filename contains `marker`.
    pub async fn fail_when_output_contains(&self, marker: impl Into<String>) {
        *self.fail_marker.write().await = Some(marker.into());
    }

    /// Recorded transcode jobs, in order.
    pub async fn recorded_jobs(&self) -> Vec<TranscodeJob> {
        self.jobs.read().await.clone()
    }

    /// Number of transcodes attempted.
    pub async fn transcode_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    async fn take_error(&self) -> Option<TranscoderError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transcode(
        &self,
        job: TranscodeJob,
        cancel: &CancellationToken,
    ) -> Result<TranscodeOutput, TranscoderError> {
        self.jobs.write().await.push(job.clone());

        if cancel.is_cancelled() {
            return Err(TranscoderError::Cancelled);
        }
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let file_name = job
            .output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(marker) = self.fail_marker.read().await.as_deref() {
            if file_name.contains(marker) {
                return Err(TranscoderError::transcode_failed(
                    "scripted transcode failure",
                    Some(format!("mock stderr for {file_name}")),
                ));
            }
        }

        let payload = self.output_payload.read().await.clone();
        tokio::fs::write(&job.output_path, &payload).await?;

        Ok(TranscodeOutput {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes: payload.len() as u64,
            duration_ms: 1,
        })
    }

    async fn validate(&self) -> Result<(), TranscoderError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(())
    }
}
