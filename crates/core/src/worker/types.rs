//! Types for the worker module.

use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::extractor::ResolvedItem;
use crate::pipeline::MediaRequest;

/// Human-readable notice delivered when a run fails.
pub const FAILURE_NOTICE: &str = "Failure, please try again later";

/// A unit of work submitted to the worker.
#[derive(Debug, Clone)]
pub enum WorkRequest {
    /// Download and transcode one item.
    Single(MediaRequest),
    /// Resolve a playlist URL and process every item in it.
    Playlist {
        source_url: String,
        format: String,
        quality_kbps: Option<u32>,
        dest_dir: PathBuf,
    },
    /// Process an already-resolved selection of items under one playlist
    /// title, skipping resolution entirely.
    SelectedItems {
        playlist_title: String,
        items: Vec<ResolvedItem>,
        format: String,
        quality_kbps: Option<u32>,
        dest_dir: PathBuf,
    },
}

/// Asynchronous message from a running submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Aggregate batch progress, 0-100, non-decreasing within a run.
    Progress(u8),
    /// Terminal message; exactly one per run, always last.
    Completed {
        success: bool,
        message: String,
        /// The finished file's name, or the playlist's resolved title.
        name: String,
    },
}

impl RunEvent {
    /// Successful completion for `name`.
    pub(crate) fn saved(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::Completed {
            success: true,
            message: format!("{name} is saved"),
            name,
        }
    }

    /// Failed completion with the generic failure notice.
    pub(crate) fn failure() -> Self {
        Self::Completed {
            success: false,
            message: FAILURE_NOTICE.to_string(),
            name: String::new(),
        }
    }
}

/// Errors returned at submission time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkerError {
    /// A run is already active on this worker; no queuing is provided.
    #[error("a run is already active")]
    Busy,
}

/// Caller-side handle for one submitted run.
pub struct RunHandle {
    /// Stream of run events; closed after the terminal `Completed`.
    pub events: mpsc::Receiver<RunEvent>,
    cancel: CancellationToken,
}

impl RunHandle {
    pub(crate) fn new(events: mpsc::Receiver<RunEvent>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Requests cancellation of the run. The in-flight step is aborted,
    /// its temp files are cleaned up, and no further batch items start.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the run's cancellation token, for wiring cancellation to
    /// an external signal while the handle itself is being polled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receives the next event, or `None` once the run is over and the
    /// channel has drained.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_event_message() {
        let event = RunEvent::saved("Test Video 1.mp3");
        assert_eq!(
            event,
            RunEvent::Completed {
                success: true,
                message: "Test Video 1.mp3 is saved".to_string(),
                name: "Test Video 1.mp3".to_string(),
            }
        );
    }

    #[test]
    fn test_failure_event_has_no_name() {
        let RunEvent::Completed {
            success,
            message,
            name,
        } = RunEvent::failure()
        else {
            panic!("failure() must build a Completed event");
        };
        assert!(!success);
        assert_eq!(message, FAILURE_NOTICE);
        assert!(name.is_empty());
    }
}
