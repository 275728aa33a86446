//! Types for the extractor module.

use serde::{Deserialize, Serialize};

/// Metadata for one media item, resolved from a source URL.
///
/// Read-only once produced by an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    /// URL the media can be fetched from.
    pub source_url: String,
    /// Item title as reported by the provider.
    pub title: String,
    /// Duration in whole seconds (0 when the provider omits it).
    pub duration_secs: u64,
    /// Container extension the provider expects to produce (may be empty
    /// for flat playlist entries, which carry no format information).
    pub provider_ext: String,
}

impl ResolvedItem {
    /// Placeholder item for failures that occur before resolution, so the
    /// outcome can still carry the requested URL.
    #[must_use]
    pub fn unresolved(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            title: String::new(),
            duration_secs: 0,
            provider_ext: String::new(),
        }
    }
}

/// An ordered playlist of resolved items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist title as reported by the provider.
    pub title: String,
    /// Items in provider order. Entries the provider could not identify are
    /// dropped during resolution; an empty list is valid.
    pub items: Vec<ResolvedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_carries_url_only() {
        let item = ResolvedItem::unresolved("https://example.com/watch?v=abc");
        assert_eq!(item.source_url, "https://example.com/watch?v=abc");
        assert!(item.title.is_empty());
        assert_eq!(item.duration_secs, 0);
    }
}
