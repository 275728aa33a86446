//! Completion sidecar files.
//!
//! Every successfully produced output file gets a small JSON record next to
//! it, `<output>.metadata.json`, holding the UTC completion timestamp.
//! Intentionally a single-file module; the feature scope does not warrant
//! sub-files.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Suffix appended to the output filename to form the sidecar filename.
pub const SIDECAR_SUFFIX: &str = ".metadata.json";

/// Errors produced while writing a sidecar.
#[derive(Debug, Error)]
pub enum SidecarError {
    /// I/O error writing the sidecar file to disk.
    #[error("I/O error writing sidecar: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct SidecarRecord {
    timestamp: DateTime<Utc>,
}

/// Derives the sidecar path for an output file.
///
/// The suffix is appended to the full filename rather than replacing the
/// extension, so `Song.mp3` maps to `Song.mp3.metadata.json`.
#[must_use]
pub fn sidecar_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.as_os_str().to_os_string();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Writes the completion sidecar next to `output_path`, overwriting any
/// previous sidecar at the same location.
///
/// Returns the sidecar path on success.
///
/// # Errors
///
/// Returns [`SidecarError`] on I/O or serialization failure; a partially
/// written file is removed before returning.
pub fn write_sidecar(output_path: &Path) -> Result<PathBuf, SidecarError> {
    let path = sidecar_path(output_path);
    let record = SidecarRecord {
        timestamp: Utc::now(),
    };

    let file = File::create(&path)?;
    let write_result = {
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, &record)
    };
    if let Err(err) = write_result {
        // A half-written record must not be mistaken for a completed one.
        let _ = std::fs::remove_file(&path);
        return Err(err.into());
    }

    debug!(path = %path.display(), "Sidecar written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path_appends_suffix() {
        assert_eq!(
            sidecar_path(Path::new("/out/Song.mp3")),
            PathBuf::from("/out/Song.mp3.metadata.json")
        );
    }

    #[test]
    fn test_sidecar_path_keeps_full_filename() {
        // The media extension must survive; the suffix is additive.
        let path = sidecar_path(Path::new("/out/Clip.mp4"));
        assert_eq!(path.file_name().unwrap(), "Clip.mp4.metadata.json");
    }

    #[test]
    fn test_write_sidecar_produces_parseable_timestamp() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("Song.mp3");
        std::fs::write(&output, b"audio").unwrap();

        let path = write_sidecar(&output).unwrap();
        assert_eq!(path, tmp.path().join("Song.mp3.metadata.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        let stamp = value["timestamp"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(stamp).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_write_sidecar_overwrites_existing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("Song.mp3");
        std::fs::write(&output, b"audio").unwrap();

        let path = sidecar_path(&output);
        std::fs::write(&path, r#"{"sentinel": true}"#).unwrap();

        write_sidecar(&output).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(value.get("sentinel").is_none());
        assert!(value.get("timestamp").is_some());
    }
}
