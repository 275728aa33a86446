//! Extraction provider module.
//!
//! Turns a source URL into structured item metadata without downloading any
//! media. The production implementation shells out to the `yt-dlp` binary;
//! the trait seam keeps the pipeline testable without it.

mod config;
mod error;
mod traits;
mod types;
mod ytdlp;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use traits::Extractor;
pub use types::{Playlist, ResolvedItem};
pub use ytdlp::YtDlpExtractor;
