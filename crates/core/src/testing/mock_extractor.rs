//! Mock extractor for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::extractor::{Extractor, ExtractorError, Playlist, ResolvedItem};

/// Mock implementation of the Extractor trait.
///
/// Provides controllable behavior for testing:
/// - Script resolution results per URL
/// - Inject a one-shot error
/// - Record resolved URLs for assertions
#[derive(Debug, Default)]
pub struct MockExtractor {
    single_results: Arc<RwLock<HashMap<String, ResolvedItem>>>,
    playlist_results: Arc<RwLock<HashMap<String, Playlist>>>,
    next_error: Arc<RwLock<Option<ExtractorError>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockExtractor {
    /// Create a new mock extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the item returned for a single-URL resolution.
    pub async fn set_single(&self, url: impl Into<String>, item: ResolvedItem) {
        self.single_results.write().await.insert(url.into(), item);
    }

    /// Script the playlist returned for a playlist-URL resolution.
    pub async fn set_playlist(&self, url: impl Into<String>, playlist: Playlist) {
        self.playlist_results
            .write()
            .await
            .insert(url.into(), playlist);
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ExtractorError) {
        *self.next_error.write().await = Some(error);
    }

    /// URLs passed to resolve calls, in order.
    pub async fn recorded_calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    async fn take_error(&self) -> Option<ExtractorError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve_single(&self, url: &str) -> Result<ResolvedItem, ExtractorError> {
        self.calls.write().await.push(url.to_string());
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.single_results
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| ExtractorError::extraction_failed(format!("no scripted item for {url}")))
    }

    async fn resolve_playlist(&self, url: &str) -> Result<Playlist, ExtractorError> {
        self.calls.write().await.push(url.to_string());
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.playlist_results
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| {
                ExtractorError::extraction_failed(format!("no scripted playlist for {url}"))
            })
    }

    async fn validate(&self) -> Result<(), ExtractorError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(())
    }
}
