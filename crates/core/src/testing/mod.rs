//! Mock implementations for testing.
//!
//! Each external collaborator has a controllable mock: scripted results,
//! one-shot error injection, and recorded calls for assertions. The fetcher
//! and transcoder mocks create real files so cleanup and finalization
//! invariants can be observed on disk.

mod mock_extractor;
mod mock_fetcher;
mod mock_transcoder;

pub use mock_extractor::MockExtractor;
pub use mock_fetcher::MockFetcher;
pub use mock_transcoder::MockTranscoder;
