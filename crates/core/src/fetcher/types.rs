//! Types for the fetcher module.

use std::path::PathBuf;

/// A request to retrieve one item's raw media.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// URL to fetch from.
    pub source_url: String,
    /// Directory the temp file is created in.
    pub dest_dir: PathBuf,
    /// Unique stem for the temp file; the fetcher appends whatever
    /// extension the retrieved media actually has.
    pub temp_stem: String,
    /// Provider-side quality selector (for example `bestaudio/best`).
    pub selector: String,
}

/// The raw media produced by a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMedia {
    /// Path of the file the provider wrote. Usually under the requested
    /// temp stem, but providers may resolve to a different container than
    /// hinted, so callers must use this path rather than reconstructing it.
    pub path: PathBuf,
    /// Size of the retrieved file in bytes.
    pub size_bytes: u64,
}
