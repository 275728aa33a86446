//! Trait definitions for the extractor module.

use async_trait::async_trait;

use super::error::ExtractorError;
use super::types::{Playlist, ResolvedItem};

/// An extraction provider that resolves source URLs into item metadata.
///
/// Implementations must never download media bytes; resolution is
/// metadata-only.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns the name of this extractor implementation.
    fn name(&self) -> &str;

    /// Resolves a single item's metadata.
    async fn resolve_single(&self, url: &str) -> Result<ResolvedItem, ExtractorError>;

    /// Resolves a playlist into its ordered items.
    ///
    /// Entries with no retrievable id are silently dropped; an empty item
    /// list is not an error.
    async fn resolve_playlist(&self, url: &str) -> Result<Playlist, ExtractorError>;

    /// Validates that the extractor is properly configured and ready.
    async fn validate(&self) -> Result<(), ExtractorError>;
}
