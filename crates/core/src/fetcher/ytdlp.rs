//! yt-dlp-based fetcher implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::config::FetcherConfig;
use super::error::FetchError;
use super::traits::Fetcher;
use super::types::{FetchRequest, FetchedMedia};

/// yt-dlp-based fetcher implementation.
///
/// Downloads to `<dest_dir>/<temp_stem>.<ext>` and reads the path the tool
/// actually produced from its `--print after_move:filepath` output, since
/// the retrieved container may differ from any hint.
pub struct YtDlpFetcher {
    config: FetcherConfig,
}

impl YtDlpFetcher {
    /// Creates a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    /// Creates a fetcher with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FetcherConfig::default())
    }

    /// Extracts the produced file path from the tool's stdout.
    fn parse_reported_path(stdout: &str) -> Option<PathBuf> {
        stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .next_back()
            .map(PathBuf::from)
    }

    /// Removes every file in `dir` whose name starts with `stem`.
    ///
    /// Used after an aborted or failed fetch; the tool may have left a
    /// partial file or a `.part` sibling behind.
    async fn remove_partials(dir: &Path, stem: &str) {
        let Ok(mut entries) = fs::read_dir(dir).await else {
            return;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(stem) {
                if let Err(err) = fs::remove_file(entry.path()).await {
                    warn!(
                        path = %entry.path().display(),
                        error = %err,
                        "Failed to remove partial download"
                    );
                }
            }
        }
    }
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn fetch(
        &self,
        request: FetchRequest,
        cancel: &CancellationToken,
    ) -> Result<FetchedMedia, FetchError> {
        let template = request
            .dest_dir
            .join(format!("{}.%(ext)s", request.temp_stem));

        let child = Command::new(&self.config.ytdlp_path)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("-f")
            .arg(&request.selector)
            .arg("-o")
            .arg(&template)
            .arg("--no-simulate")
            .arg("--print")
            .arg("after_move:filepath")
            .args(&self.config.extra_args)
            .arg(&request.source_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FetchError::ToolNotFound {
                        path: self.config.ytdlp_path.clone(),
                    }
                } else {
                    FetchError::Io(e)
                }
            })?;

        // kill_on_drop tears the subprocess down when the cancel arm wins.
        let output = tokio::select! {
            output = child.wait_with_output() => output.map_err(FetchError::Io)?,
            _ = cancel.cancelled() => {
                Self::remove_partials(&request.dest_dir, &request.temp_stem).await;
                return Err(FetchError::Cancelled);
            }
        };

        if !output.status.success() {
            Self::remove_partials(&request.dest_dir, &request.temp_stem).await;
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::fetch_failed(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = Self::parse_reported_path(&stdout)
            .ok_or_else(|| FetchError::fetch_failed("tool reported no output path"))?;

        let meta = fs::metadata(&path)
            .await
            .map_err(|_| FetchError::OutputMissing { path: path.clone() })?;

        debug!(path = %path.display(), size_bytes = meta.len(), "Fetched media");
        Ok(FetchedMedia {
            path,
            size_bytes: meta.len(),
        })
    }

    async fn validate(&self) -> Result<(), FetchError> {
        let result = Command::new(&self.config.ytdlp_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FetchError::ToolNotFound {
                path: self.config.ytdlp_path.clone(),
            }),
            Err(e) => Err(FetchError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reported_path_takes_last_line() {
        let stdout = "warning: something\n/tmp/out/.tapedeck-abc.webm\n";
        assert_eq!(
            YtDlpFetcher::parse_reported_path(stdout),
            Some(PathBuf::from("/tmp/out/.tapedeck-abc.webm"))
        );
    }

    #[test]
    fn test_parse_reported_path_empty_stdout() {
        assert_eq!(YtDlpFetcher::parse_reported_path("\n  \n"), None);
    }

    #[tokio::test]
    async fn test_remove_partials_only_touches_matching_stem() {
        let tmp = tempfile::TempDir::new().unwrap();
        let keep = tmp.path().join("Song.mp3");
        let partial = tmp.path().join(".tapedeck-xyz.webm.part");
        std::fs::write(&keep, b"keep").unwrap();
        std::fs::write(&partial, b"partial").unwrap();

        YtDlpFetcher::remove_partials(tmp.path(), ".tapedeck-xyz").await;

        assert!(keep.exists());
        assert!(!partial.exists());
    }
}
