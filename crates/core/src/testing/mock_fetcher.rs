//! Mock fetcher for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::fetcher::{FetchError, FetchRequest, Fetcher, FetchedMedia};

/// Mock implementation of the Fetcher trait.
///
/// Creates a real file for every successful fetch so on-disk cleanup
/// invariants are observable. Controllable behavior:
/// - Override the produced extension or the exact produced path
/// - Inject a one-shot error
/// - Park a specific call until the run is cancelled
/// - Record fetch requests for assertions
#[derive(Debug)]
pub struct MockFetcher {
    requests: Arc<RwLock<Vec<FetchRequest>>>,
    next_error: Arc<RwLock<Option<FetchError>>>,
    produced_ext: Arc<RwLock<String>>,
    fixed_path: Arc<RwLock<Option<PathBuf>>>,
    payload: Arc<RwLock<Vec<u8>>>,
    park_on_call: Arc<RwLock<Option<usize>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// Create a new mock fetcher producing `.webm` files.
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            produced_ext: Arc::new(RwLock::new("webm".to_string())),
            fixed_path: Arc::new(RwLock::new(None)),
            payload: Arc::new(RwLock::new(b"raw media".to_vec())),
            park_on_call: Arc::new(RwLock::new(None)),
        }
    }

    /// Extension of the file produced for each fetch.
    pub async fn set_produced_ext(&self, ext: impl Into<String>) {
        *self.produced_ext.write().await = ext.into();
    }

    /// Produce every fetch at this exact path instead of under the
    /// requested temp stem.
    pub async fn set_fixed_path(&self, path: PathBuf) {
        *self.fixed_path.write().await = Some(path);
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Park the n-th fetch (1-based) until the run's token is cancelled,
    /// then fail it with [`FetchError::Cancelled`].
    pub async fn park_until_cancelled_on_call(&self, call: usize) {
        *self.park_on_call.write().await = Some(call);
    }

    /// Recorded fetch requests, in order.
    pub async fn recorded_requests(&self) -> Vec<FetchRequest> {
        self.requests.read().await.clone()
    }

    /// Number of fetches attempted.
    pub async fn fetch_count(&self) -> usize {
        self.requests.read().await.len()
    }

    async fn take_error(&self) -> Option<FetchError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(
        &self,
        request: FetchRequest,
        cancel: &CancellationToken,
    ) -> Result<FetchedMedia, FetchError> {
        let call_index = {
            let mut requests = self.requests.write().await;
            requests.push(request.clone());
            requests.len()
        };

        if *self.park_on_call.read().await == Some(call_index) {
            cancel.cancelled().await;
            return Err(FetchError::Cancelled);
        }
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let path = match self.fixed_path.read().await.clone() {
            Some(path) => path,
            None => {
                let ext = self.produced_ext.read().await.clone();
                request.dest_dir.join(format!("{}.{ext}", request.temp_stem))
            }
        };

        let payload = self.payload.read().await.clone();
        tokio::fs::write(&path, &payload).await?;

        Ok(FetchedMedia {
            path,
            size_bytes: payload.len() as u64,
        })
    }

    async fn validate(&self) -> Result<(), FetchError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(dir: &std::path::Path) -> FetchRequest {
        FetchRequest {
            source_url: "https://example.com/v".to_string(),
            dest_dir: dir.to_path_buf(),
            temp_stem: ".tapedeck-test".to_string(),
            selector: "bestaudio/best".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_creates_temp_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let fetcher = MockFetcher::new();
        let cancel = CancellationToken::new();

        let media = fetcher.fetch(request(tmp.path()), &cancel).await.unwrap();
        assert_eq!(media.path, tmp.path().join(".tapedeck-test.webm"));
        assert!(media.path.exists());
        assert_eq!(fetcher.fetch_count().await, 1);
    }

    #[tokio::test]
    async fn test_error_injection_creates_no_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let fetcher = MockFetcher::new();
        fetcher.set_next_error(FetchError::fetch_failed("down")).await;
        let cancel = CancellationToken::new();

        assert!(fetcher.fetch(request(tmp.path()), &cancel).await.is_err());
        assert!(!tmp.path().join(".tapedeck-test.webm").exists());
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let tmp = tempfile::TempDir::new().unwrap();
        let fetcher = MockFetcher::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = fetcher.fetch(request(tmp.path()), &cancel).await;
        assert!(matches!(result, Err(FetchError::Cancelled)));
    }
}
