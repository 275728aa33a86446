//! Batch orchestration module.
//!
//! Runs the item pipeline over an ordered list of items that share one
//! playlist. Items are processed strictly sequentially in input order; a
//! failing item is recorded and never aborts its siblings. Aggregated
//! progress is emitted after each item completes.

mod runner;
mod types;

pub use runner::BatchOrchestrator;
pub use types::BatchResult;
