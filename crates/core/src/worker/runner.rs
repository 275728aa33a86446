//! Worker implementation.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::batch::BatchOrchestrator;
use crate::extractor::{Extractor, ResolvedItem};
use crate::fetcher::Fetcher;
use crate::pipeline::{ItemPipeline, ItemStatus, MediaRequest, OutputFormat};
use crate::transcoder::Transcoder;

use super::types::{RunEvent, RunHandle, WorkRequest, WorkerError};

/// Event channel capacity per run. Sends block once the caller stops
/// draining, which in turn pauses the run instead of dropping events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Runs submissions on a background task, one at a time.
pub struct Worker<E: Extractor, F: Fetcher, T: Transcoder> {
    extractor: Arc<E>,
    pipeline: Arc<ItemPipeline<E, F, T>>,
    batch: Arc<BatchOrchestrator<E, F, T>>,
    active: Arc<AtomicBool>,
}

impl<E, F, T> Worker<E, F, T>
where
    E: Extractor + 'static,
    F: Fetcher + 'static,
    T: Transcoder + 'static,
{
    /// Creates a worker around the given collaborators.
    pub fn new(extractor: Arc<E>, fetcher: Arc<F>, transcoder: Arc<T>) -> Self {
        let pipeline = Arc::new(ItemPipeline::new(
            Arc::clone(&extractor),
            fetcher,
            transcoder,
        ));
        let batch = Arc::new(BatchOrchestrator::new(Arc::clone(&pipeline)));
        Self {
            extractor,
            pipeline,
            batch,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a run is currently active.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Submits a run.
    ///
    /// The run starts immediately on a background task; the caller is never
    /// blocked. The returned handle yields the run's events and can cancel
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Busy`] while another run is active; there is
    /// no queuing.
    pub fn submit(&self, request: WorkRequest) -> Result<RunHandle, WorkerError> {
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(WorkerError::Busy);
        }

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let extractor = Arc::clone(&self.extractor);
        let pipeline = Arc::clone(&self.pipeline);
        let batch = Arc::clone(&self.batch);
        let active = Arc::clone(&self.active);
        let run_cancel = cancel.clone();

        tokio::spawn(async move {
            let completed =
                Self::execute(extractor, pipeline, batch, request, &events_tx, &run_cancel).await;
            // Release the slot before announcing completion, so a caller
            // reacting to the terminal event can submit again right away.
            active.store(false, Ordering::SeqCst);
            let _ = events_tx.send(completed).await;
        });

        Ok(RunHandle::new(events_rx, cancel))
    }

    async fn execute(
        extractor: Arc<E>,
        pipeline: Arc<ItemPipeline<E, F, T>>,
        batch: Arc<BatchOrchestrator<E, F, T>>,
        request: WorkRequest,
        events_tx: &mpsc::Sender<RunEvent>,
        cancel: &CancellationToken,
    ) -> RunEvent {
        match request {
            WorkRequest::Single(media_request) => {
                let outcome = pipeline.run_single(&media_request, cancel).await;
                match (outcome.status, outcome.output_filename) {
                    (ItemStatus::Success, Some(name)) => RunEvent::saved(name),
                    _ => RunEvent::failure(),
                }
            }
            WorkRequest::Playlist {
                source_url,
                format,
                quality_kbps,
                dest_dir,
            } => {
                let media_request = MediaRequest {
                    source_url,
                    format,
                    quality_kbps,
                    dest_dir,
                };
                let valid = match ItemPipeline::<E, F, T>::validate_request(&media_request) {
                    Ok(valid) => valid,
                    Err(err) => {
                        warn!(error = %err, "Playlist request rejected");
                        return RunEvent::failure();
                    }
                };
                let playlist = match extractor.resolve_playlist(&valid.source_url).await {
                    Ok(playlist) => playlist,
                    Err(err) => {
                        warn!(url = %valid.source_url, error = %err, "Playlist resolution failed");
                        return RunEvent::failure();
                    }
                };
                Self::run_batch(
                    &batch,
                    &playlist.title,
                    &playlist.items,
                    valid.format,
                    valid.quality_kbps,
                    &valid.dest_dir,
                    events_tx,
                    cancel,
                )
                .await
            }
            WorkRequest::SelectedItems {
                playlist_title,
                items,
                format,
                quality_kbps,
                dest_dir,
            } => {
                let Some(format) = OutputFormat::parse(&format) else {
                    warn!(format = %format, "Selection request rejected: unrecognized format");
                    return RunEvent::failure();
                };
                Self::run_batch(
                    &batch,
                    &playlist_title,
                    &items,
                    format,
                    quality_kbps,
                    &dest_dir,
                    events_tx,
                    cancel,
                )
                .await
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_batch(
        batch: &BatchOrchestrator<E, F, T>,
        playlist_title: &str,
        items: &[ResolvedItem],
        format: OutputFormat,
        quality_kbps: Option<u32>,
        dest_dir: &Path,
        events_tx: &mpsc::Sender<RunEvent>,
        cancel: &CancellationToken,
    ) -> RunEvent {
        let (progress_tx, mut progress_rx) = mpsc::channel::<u8>(EVENT_CHANNEL_CAPACITY);
        let forward_tx = events_tx.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(percent) = progress_rx.recv().await {
                if forward_tx.send(RunEvent::Progress(percent)).await.is_err() {
                    break;
                }
            }
        });

        let result = batch
            .run(
                playlist_title,
                items,
                format,
                quality_kbps,
                dest_dir,
                Some(&progress_tx),
                cancel,
            )
            .await;

        // Drain the bridge so every progress event precedes the terminal one.
        drop(progress_tx);
        let _ = forwarder.await;

        match result {
            Ok(batch_result) if !cancel.is_cancelled() => {
                RunEvent::saved(batch_result.playlist_title)
            }
            Ok(_) => RunEvent::failure(),
            Err(err) => {
                warn!(title = %playlist_title, error = %err, "Batch run failed");
                RunEvent::failure()
            }
        }
    }
}
