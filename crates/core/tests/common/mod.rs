#![allow(dead_code)]

//! Common test utilities for scenario testing with mocks.
//!
//! Provides a fixture wiring the real pipeline, batch orchestrator, and
//! worker to fully controllable mocks, plus a temp directory acting as the
//! destination. No external tools are required.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use tapedeck_core::batch::BatchOrchestrator;
use tapedeck_core::extractor::ResolvedItem;
use tapedeck_core::pipeline::ItemPipeline;
use tapedeck_core::testing::{MockExtractor, MockFetcher, MockTranscoder};
use tapedeck_core::worker::Worker;

pub type TestPipeline = ItemPipeline<MockExtractor, MockFetcher, MockTranscoder>;
pub type TestBatch = BatchOrchestrator<MockExtractor, MockFetcher, MockTranscoder>;
pub type TestWorker = Worker<MockExtractor, MockFetcher, MockTranscoder>;

/// Test fixture with mock collaborators and a temp destination.
pub struct Fixture {
    pub extractor: Arc<MockExtractor>,
    pub fetcher: Arc<MockFetcher>,
    pub transcoder: Arc<MockTranscoder>,
    pub pipeline: Arc<TestPipeline>,
    pub batch: Arc<TestBatch>,
    pub temp: TempDir,
}

impl Fixture {
    /// Create a fixture with fresh mocks.
    pub fn new() -> Self {
        let extractor = Arc::new(MockExtractor::new());
        let fetcher = Arc::new(MockFetcher::new());
        let transcoder = Arc::new(MockTranscoder::new());
        let pipeline = Arc::new(ItemPipeline::new(
            Arc::clone(&extractor),
            Arc::clone(&fetcher),
            Arc::clone(&transcoder),
        ));
        let batch = Arc::new(BatchOrchestrator::new(Arc::clone(&pipeline)));
        let temp = TempDir::new().expect("Failed to create temp dir");

        Self {
            extractor,
            fetcher,
            transcoder,
            pipeline,
            batch,
            temp,
        }
    }

    /// Destination directory for this fixture.
    pub fn dest(&self) -> PathBuf {
        self.temp.path().to_path_buf()
    }

    /// A worker sharing this fixture's mocks.
    pub fn worker(&self) -> TestWorker {
        Worker::new(
            Arc::clone(&self.extractor),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.transcoder),
        )
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a resolved item for tests.
pub fn item(url: &str, title: &str, duration_secs: u64) -> ResolvedItem {
    ResolvedItem {
        source_url: url.to_string(),
        title: title.to_string(),
        duration_secs,
        provider_ext: "webm".to_string(),
    }
}

/// Names of all entries in a directory, sorted.
pub fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Whether any leftover temp file remains under `dir` (recursively one
/// level deep, covering playlist subdirectories).
pub fn has_temp_leftovers(dir: &std::path::Path) -> bool {
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current).expect("Failed to read dir") {
            let entry = entry.unwrap();
            if entry.path().is_dir() {
                pending.push(entry.path());
            } else if entry
                .file_name()
                .to_string_lossy()
                .starts_with(".tapedeck-")
            {
                return true;
            }
        }
    }
    false
}
