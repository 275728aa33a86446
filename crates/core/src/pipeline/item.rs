//! Single-item pipeline implementation.

use std::path::Path;
use std::sync::Arc;

use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extractor::{Extractor, ResolvedItem};
use crate::fetcher::{FetchRequest, Fetcher};
use crate::sanitize::sanitize;
use crate::sidecar::write_sidecar;
use crate::transcoder::{TranscodeJob, TranscodeProfile, Transcoder};

use super::error::PipelineError;
use super::types::{ItemOutcome, MediaRequest, OutputFormat, ValidRequest};

/// Drives one item from resolved metadata to a finished output file.
///
/// Generic over its collaborators so tests can wire in mocks; production
/// code uses the yt-dlp and ffmpeg adapters.
pub struct ItemPipeline<E: Extractor, F: Fetcher, T: Transcoder> {
    extractor: Arc<E>,
    fetcher: Arc<F>,
    transcoder: Arc<T>,
}

impl<E, F, T> ItemPipeline<E, F, T>
where
    E: Extractor,
    F: Fetcher,
    T: Transcoder,
{
    /// Creates a new item pipeline.
    pub fn new(extractor: Arc<E>, fetcher: Arc<F>, transcoder: Arc<T>) -> Self {
        Self {
            extractor,
            fetcher,
            transcoder,
        }
    }

    /// Validates a raw request before any I/O.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank URL or an unrecognized
    /// format string.
    pub fn validate_request(request: &MediaRequest) -> Result<ValidRequest, PipelineError> {
        let source_url = request.source_url.trim();
        if source_url.is_empty() {
            return Err(PipelineError::validation("source URL is empty"));
        }
        let format = OutputFormat::parse(&request.format).ok_or_else(|| {
            PipelineError::validation(format!("unrecognized format: {:?}", request.format))
        })?;
        Ok(ValidRequest {
            source_url: source_url.to_string(),
            format,
            quality_kbps: request.quality_kbps,
            dest_dir: request.dest_dir.clone(),
        })
    }

    /// Runs a raw single-item request: validate, resolve, then the item
    /// chain. Never returns an error; every failure is captured in the
    /// outcome.
    pub async fn run_single(
        &self,
        request: &MediaRequest,
        cancel: &CancellationToken,
    ) -> ItemOutcome {
        let valid = match Self::validate_request(request) {
            Ok(valid) => valid,
            Err(err) => {
                warn!(url = %request.source_url, error = %err, "Request rejected");
                return ItemOutcome::failed(
                    ResolvedItem::unresolved(request.source_url.clone()),
                    err.record(),
                );
            }
        };

        let item = match self.extractor.resolve_single(&valid.source_url).await {
            Ok(item) => item,
            Err(err) => {
                let err = PipelineError::from(err);
                warn!(url = %valid.source_url, error = %err, "Resolution failed");
                return ItemOutcome::failed(
                    ResolvedItem::unresolved(valid.source_url.clone()),
                    err.record(),
                );
            }
        };

        self.run_item(&item, valid.format, valid.quality_kbps, &valid.dest_dir, cancel)
            .await
    }

    /// Runs the chain for one already-resolved item.
    pub async fn run_item(
        &self,
        item: &ResolvedItem,
        format: OutputFormat,
        quality_kbps: Option<u32>,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> ItemOutcome {
        match self
            .drive_item(item, format, quality_kbps, dest_dir, cancel)
            .await
        {
            Ok(output_filename) => {
                info!(title = %item.title, file = %output_filename, "Item completed");
                ItemOutcome::success(item.clone(), output_filename)
            }
            Err(err) => {
                warn!(title = %item.title, error = %err, "Item failed");
                ItemOutcome::failed(item.clone(), err.record())
            }
        }
    }

    async fn drive_item(
        &self,
        item: &ResolvedItem,
        format: OutputFormat,
        quality_kbps: Option<u32>,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let safe_title = sanitize(&item.title);
        let output_filename = format!("{safe_title}.{}", format.extension());
        let target_path = dest_dir.join(&output_filename);

        fs::create_dir_all(dest_dir)
            .await
            .map_err(|source| PipelineError::FileSystem {
                path: dest_dir.to_path_buf(),
                source,
            })?;

        // The final name is never downloaded to directly; a uniquely named
        // temp file keeps half-written data away from the visible path.
        let temp_stem = format!(".tapedeck-{}", Uuid::new_v4());
        let fetched = self
            .fetcher
            .fetch(
                FetchRequest {
                    source_url: item.source_url.clone(),
                    dest_dir: dest_dir.to_path_buf(),
                    temp_stem,
                    selector: format.selector().to_string(),
                },
                cancel,
            )
            .await?;

        if cancel.is_cancelled() {
            cleanup_file(&fetched.path).await;
            return Err(PipelineError::Cancelled);
        }

        // The provider may already have produced the exact target; then
        // finalization is just the completion record.
        if fetched.path == target_path {
            debug!(path = %target_path.display(), "Fetched file already matches target");
            self.finalize(&target_path).await?;
            return Ok(output_filename);
        }

        let job = TranscodeJob {
            job_id: safe_title.clone(),
            input_path: fetched.path.clone(),
            output_path: target_path.clone(),
            profile: match format {
                OutputFormat::Mp3 => TranscodeProfile::mp3(quality_kbps),
                OutputFormat::Mp4 => TranscodeProfile::mp4(quality_kbps),
            },
        };

        let result = self.transcoder.transcode(job, cancel).await;
        cleanup_file(&fetched.path).await;
        result?;

        self.finalize(&target_path).await?;
        Ok(output_filename)
    }

    /// Records completion next to the output file. If the record cannot be
    /// written the output is removed too, so a file at the target path
    /// always implies a recorded success.
    async fn finalize(&self, target_path: &Path) -> Result<(), PipelineError> {
        if let Err(err) = write_sidecar(target_path) {
            cleanup_file(target_path).await;
            return Err(err.into());
        }
        Ok(())
    }
}

/// Best-effort file removal; only unexpected failures are logged.
async fn cleanup_file(path: &Path) {
    if let Err(err) = fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %err, "Failed to remove file");
        }
    }
}
