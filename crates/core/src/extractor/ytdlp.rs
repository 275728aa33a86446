//! yt-dlp-based extractor implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::config::ExtractorConfig;
use super::error::ExtractorError;
use super::traits::Extractor;
use super::types::{Playlist, ResolvedItem};

/// Title used when a single item reports none.
const FALLBACK_ITEM_TITLE: &str = "downloaded_file";

/// Title used when a playlist reports none.
const FALLBACK_PLAYLIST_TITLE: &str = "playlist";

/// yt-dlp-based extractor implementation.
///
/// Spawns the binary with `-J` and parses the JSON document it prints to
/// stdout. Playlists are resolved flat, so entries carry metadata only.
pub struct YtDlpExtractor {
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    /// Creates a new extractor with the given configuration.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Creates an extractor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExtractorConfig::default())
    }

    async fn dump_json(&self, url: &str, flat_playlist: bool) -> Result<String, ExtractorError> {
        let mut command = Command::new(&self.config.ytdlp_path);
        if flat_playlist {
            command.arg("--flat-playlist");
        } else {
            command.arg("--no-playlist");
        }
        command
            .arg("-J")
            .args(&self.config.extra_args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = command.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExtractorError::ToolNotFound {
                    path: self.config.ytdlp_path.clone(),
                }
            } else {
                ExtractorError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractorError::extraction_failed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Parses a `-J --no-playlist` dump into a resolved item.
    fn parse_single(url: &str, raw: &str) -> Result<ResolvedItem, ExtractorError> {
        #[derive(Deserialize)]
        struct SingleDump {
            title: Option<String>,
            duration: Option<f64>,
            ext: Option<String>,
            webpage_url: Option<String>,
        }

        let dump: SingleDump = serde_json::from_str(raw).map_err(|e| {
            ExtractorError::parse_error(format!("invalid item metadata document: {e}"))
        })?;

        Ok(ResolvedItem {
            source_url: dump.webpage_url.unwrap_or_else(|| url.to_string()),
            title: dump
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| FALLBACK_ITEM_TITLE.to_string()),
            duration_secs: dump.duration.map(|d| d.round() as u64).unwrap_or(0),
            provider_ext: dump.ext.unwrap_or_default(),
        })
    }

    /// Parses a `-J --flat-playlist` dump into a playlist.
    ///
    /// Entries without an id cannot be fetched later and are dropped.
    fn parse_playlist(raw: &str) -> Result<Playlist, ExtractorError> {
        #[derive(Deserialize)]
        struct PlaylistDump {
            title: Option<String>,
            entries: Option<Vec<Option<EntryDump>>>,
        }

        #[derive(Deserialize)]
        struct EntryDump {
            id: Option<String>,
            title: Option<String>,
            duration: Option<f64>,
            url: Option<String>,
        }

        let dump: PlaylistDump = serde_json::from_str(raw).map_err(|e| {
            ExtractorError::parse_error(format!("invalid playlist document: {e}"))
        })?;

        let items = dump
            .entries
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|entry| {
                let id = entry.id?;
                let source_url = entry
                    .url
                    .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={id}"));
                Some(ResolvedItem {
                    source_url,
                    title: entry.title.unwrap_or_else(|| "Unknown".to_string()),
                    duration_secs: entry.duration.map(|d| d.round() as u64).unwrap_or(0),
                    provider_ext: String::new(),
                })
            })
            .collect();

        Ok(Playlist {
            title: dump
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| FALLBACK_PLAYLIST_TITLE.to_string()),
            items,
        })
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn resolve_single(&self, url: &str) -> Result<ResolvedItem, ExtractorError> {
        let raw = self.dump_json(url, false).await?;
        let item = Self::parse_single(url, &raw)?;
        debug!(title = %item.title, duration_secs = item.duration_secs, "Resolved item");
        Ok(item)
    }

    async fn resolve_playlist(&self, url: &str) -> Result<Playlist, ExtractorError> {
        let raw = self.dump_json(url, true).await?;
        let playlist = Self::parse_playlist(&raw)?;
        debug!(
            title = %playlist.title,
            count = playlist.items.len(),
            "Resolved playlist"
        );
        Ok(playlist)
    }

    async fn validate(&self) -> Result<(), ExtractorError> {
        let result = Command::new(&self.config.ytdlp_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExtractorError::ToolNotFound {
                    path: self.config.ytdlp_path.clone(),
                })
            }
            Err(e) => Err(ExtractorError::Io(e)),
        }
    }
}
