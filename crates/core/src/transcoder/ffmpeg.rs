//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use regex_lite::Regex;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;

use super::config::TranscoderConfig;
use super::error::TranscoderError;
use super::traits::Transcoder;
use super::types::{TranscodeJob, TranscodeOutput, TranscodeProfile};

/// FFmpeg-based transcoder implementation.
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

/// How a transcode subprocess run ended.
enum Driven {
    Finished(std::io::Result<ExitStatus>, String),
    TimedOut,
    Cancelled,
}

impl FfmpegTranscoder {
    /// Creates a new FFmpeg transcoder with the given configuration.
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TranscoderConfig::default())
    }

    /// Builds the ffmpeg argument vector for a job.
    fn build_args(&self, job: &TranscodeJob) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            job.input_path.to_string_lossy().to_string(),
        ];

        match &job.profile {
            TranscodeProfile::Mp3 { bitrate_kbps } => {
                args.extend([
                    "-c:a".to_string(),
                    "libmp3lame".to_string(),
                    "-b:a".to_string(),
                    format!("{}k", bitrate_kbps),
                    "-f".to_string(),
                    "mp3".to_string(),
                ]);
            }
            TranscodeProfile::Mp4 { video_bitrate_kbps } => {
                args.extend([
                    "-c:v".to_string(),
                    "libx264".to_string(),
                    "-c:a".to_string(),
                    "aac".to_string(),
                ]);
                if let Some(bitrate) = video_bitrate_kbps {
                    args.extend(["-b:v".to_string(), format!("{}k", bitrate)]);
                }
                args.extend(["-f".to_string(), "mp4".to_string()]);
            }
        }

        // Log level
        args.extend([
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
        ]);

        // Progress output for parsing
        args.extend(["-progress".to_string(), "pipe:2".to_string()]);

        // Extra args
        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        // Output
        args.push(job.output_path.to_string_lossy().to_string());

        args
    }

    async fn run_transcode(
        &self,
        job: &TranscodeJob,
        cancel: &CancellationToken,
    ) -> Result<TranscodeOutput, TranscoderError> {
        let start = Instant::now();

        if tokio::fs::metadata(&job.input_path).await.is_err() {
            return Err(TranscoderError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        // Ensure output directory exists
        if let Some(parent) = job.output_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|_| {
                TranscoderError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                }
            })?;
        }

        let args = self.build_args(job);

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TranscoderError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    TranscoderError::Io(e)
                }
            })?;

        let stderr = child.stderr.take().expect("stderr should be captured");
        let mut reader = BufReader::new(stderr).lines();

        let time_regex = Regex::new(r"out_time_ms=(\d+)").ok();
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        let drive = async {
            let mut error_output = String::new();
            let mut last_log = Instant::now();
            let log_interval = Duration::from_millis(500);

            while let Ok(Some(line)) = reader.next_line().await {
                // Capture error output for diagnostics
                if line.contains("Error") || line.contains("error") {
                    error_output.push_str(&line);
                    error_output.push('\n');
                }

                // Parse progress for log correlation
                if let Some(ref re) = time_regex {
                    if let Some(caps) = re.captures(&line) {
                        if let Some(ms_str) = caps.get(1) {
                            if let Ok(us) = ms_str.as_str().parse::<f64>() {
                                if last_log.elapsed() >= log_interval {
                                    tracing::debug!(
                                        job_id = %job.job_id,
                                        time_secs = us / 1_000_000.0,
                                        "Transcode progress"
                                    );
                                    last_log = Instant::now();
                                }
                            }
                        }
                    }
                }
            }

            let status = child.wait().await;
            (status, error_output)
        };

        let driven = tokio::select! {
            res = timeout(timeout_duration, drive) => match res {
                Ok((status, error_output)) => Driven::Finished(status, error_output),
                Err(_) => Driven::TimedOut,
            },
            _ = cancel.cancelled() => Driven::Cancelled,
        };

        match driven {
            Driven::Finished(Ok(status), error_output) => {
                if !status.success() {
                    let _ = tokio::fs::remove_file(&job.output_path).await;
                    return Err(TranscoderError::transcode_failed(
                        format!("ffmpeg exited with code: {:?}", status.code()),
                        if error_output.is_empty() {
                            None
                        } else {
                            Some(error_output)
                        },
                    ));
                }
            }
            Driven::Finished(Err(e), _) => {
                let _ = tokio::fs::remove_file(&job.output_path).await;
                return Err(TranscoderError::Io(e));
            }
            Driven::TimedOut => {
                let _ = child.kill().await;
                let _ = tokio::fs::remove_file(&job.output_path).await;
                return Err(TranscoderError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
            Driven::Cancelled => {
                let _ = child.kill().await;
                let _ = tokio::fs::remove_file(&job.output_path).await;
                return Err(TranscoderError::Cancelled);
            }
        }

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| TranscoderError::transcode_failed("output file not created", None))?;

        Ok(TranscodeOutput {
            job_id: job.job_id.clone(),
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn transcode(
        &self,
        job: TranscodeJob,
        cancel: &CancellationToken,
    ) -> Result<TranscodeOutput, TranscoderError> {
        self.run_transcode(&job, cancel).await
    }

    async fn validate(&self) -> Result<(), TranscoderError> {
        let result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TranscoderError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                })
            }
            Err(e) => Err(TranscoderError::Io(e)),
        }
    }
}
