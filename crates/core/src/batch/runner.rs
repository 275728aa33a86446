//! Batch orchestrator implementation.

use std::path::Path;
use std::sync::Arc;

use tokio::fs;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::extractor::{Extractor, ResolvedItem};
use crate::fetcher::Fetcher;
use crate::pipeline::{ItemPipeline, OutputFormat, PipelineError};
use crate::sanitize::sanitize;
use crate::transcoder::Transcoder;

use super::types::BatchResult;

/// Runs the item pipeline over an ordered playlist of items.
pub struct BatchOrchestrator<E: Extractor, F: Fetcher, T: Transcoder> {
    pipeline: Arc<ItemPipeline<E, F, T>>,
}

impl<E, F, T> BatchOrchestrator<E, F, T>
where
    E: Extractor,
    F: Fetcher,
    T: Transcoder,
{
    /// Creates a new batch orchestrator driving the given pipeline.
    pub fn new(pipeline: Arc<ItemPipeline<E, F, T>>) -> Self {
        Self { pipeline }
    }

    /// Runs the batch.
    ///
    /// Outputs land in `dest_dir/<sanitized playlist title>/`. After each
    /// item an aggregate percentage is sent on `progress_tx`; for an empty
    /// batch a single `100` is sent and the result is empty. Cancellation
    /// stops the batch before the next item starts.
    ///
    /// # Errors
    ///
    /// Fails only when the playlist subdirectory cannot be created; item
    /// failures are recorded per item and never abort the run.
    #[allow(clippy::too_many_arguments)]
    pub async fn run(
        &self,
        playlist_title: &str,
        items: &[ResolvedItem],
        format: OutputFormat,
        quality_kbps: Option<u32>,
        dest_dir: &Path,
        progress_tx: Option<&mpsc::Sender<u8>>,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, PipelineError> {
        let playlist_dir = dest_dir.join(sanitize(playlist_title));
        fs::create_dir_all(&playlist_dir)
            .await
            .map_err(|source| PipelineError::FileSystem {
                path: playlist_dir.clone(),
                source,
            })?;

        let total = items.len();
        info!(title = %playlist_title, total, "Starting batch");

        if total == 0 {
            emit_progress(progress_tx, 100).await;
            return Ok(BatchResult {
                playlist_title: playlist_title.to_string(),
                playlist_dir,
                items: Vec::new(),
            });
        }

        let mut outcomes = Vec::with_capacity(total);
        for (idx, item) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(
                    title = %playlist_title,
                    completed = outcomes.len(),
                    total,
                    "Batch cancelled"
                );
                break;
            }

            let outcome = self
                .pipeline
                .run_item(item, format, quality_kbps, &playlist_dir, cancel)
                .await;
            outcomes.push(outcome);

            emit_progress(progress_tx, percent(idx + 1, total)).await;
        }

        info!(
            title = %playlist_title,
            total,
            completed = outcomes.len(),
            "Batch finished"
        );
        Ok(BatchResult {
            playlist_title: playlist_title.to_string(),
            playlist_dir,
            items: outcomes,
        })
    }
}

/// Aggregate percentage after `done` of `total` items.
fn percent(done: usize, total: usize) -> u8 {
    (100.0 * done as f64 / total as f64).round() as u8
}

async fn emit_progress(progress_tx: Option<&mpsc::Sender<u8>>, value: u8) {
    if let Some(tx) = progress_tx {
        // A dropped receiver only means nobody is watching anymore.
        let _ = tx.send(value).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds_per_step() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(3, 3), 100);
    }

    #[test]
    fn test_percent_single_item() {
        assert_eq!(percent(1, 1), 100);
    }

    #[test]
    fn test_percent_is_monotone() {
        for total in 1..=20 {
            let mut last = 0;
            for done in 1..=total {
                let p = percent(done, total);
                assert!(p >= last, "progress regressed at {done}/{total}");
                last = p;
            }
            assert_eq!(last, 100, "progress must end at 100 for total {total}");
        }
    }
}
