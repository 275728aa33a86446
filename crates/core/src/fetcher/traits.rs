//! Trait definitions for the fetcher module.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::FetchError;
use super::types::{FetchRequest, FetchedMedia};

/// Retrieves raw media for one item into a temporary file.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Downloads the requested media.
    ///
    /// On cancellation the in-flight transfer is aborted and any partial
    /// temp file under the request's stem is removed before returning
    /// [`FetchError::Cancelled`].
    async fn fetch(
        &self,
        request: FetchRequest,
        cancel: &CancellationToken,
    ) -> Result<FetchedMedia, FetchError>;

    /// Validates that the fetcher is properly configured and ready.
    async fn validate(&self) -> Result<(), FetchError>;
}
