//! Types for the batch module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pipeline::ItemOutcome;

/// Result of a batch run, owned by the caller once emitted.
///
/// There is no aggregate failed status; inspect the individual outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Playlist title as resolved by the provider.
    pub playlist_title: String,
    /// Subdirectory all of the batch's outputs were written to.
    pub playlist_dir: PathBuf,
    /// One outcome per processed item, in input order.
    pub items: Vec<ItemOutcome>,
}

impl BatchResult {
    /// Number of items that completed successfully.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|o| o.is_success()).count()
    }

    /// Number of items that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}
