//! Background execution boundary.
//!
//! Decouples a potentially long-running single-item or batch run from the
//! caller's control path. A submitted run executes on its own tokio task
//! and reports back through a channel: zero or more `Progress` events
//! (batch runs only, non-decreasing) followed by exactly one `Completed`
//! event, which is always the last message for the run.

mod runner;
mod types;

pub use runner::Worker;
pub use types::{RunEvent, RunHandle, WorkRequest, WorkerError, FAILURE_NOTICE};
