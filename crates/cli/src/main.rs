use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tapedeck_core::extractor::Extractor;
use tapedeck_core::fetcher::Fetcher;
use tapedeck_core::transcoder::Transcoder;
use tapedeck_core::{
    load_config, validate_config, Config, FfmpegTranscoder, MediaRequest, RunEvent, WorkRequest,
    Worker, YtDlpExtractor, YtDlpFetcher,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Mp3,
    Mp4,
}

impl FormatArg {
    fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
        }
    }
}

impl std::fmt::Display for FormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tapedeck",
    version,
    about = "Download media and transcode it to mp3 or mp4"
)]
struct Args {
    /// Source URL (single item, or a playlist with --playlist)
    url: String,

    /// Output container
    #[arg(long, value_enum, default_value_t = FormatArg::Mp3)]
    format: FormatArg,

    /// Bitrate in kbps (audio bitrate for mp3, video bitrate for mp4)
    #[arg(long)]
    quality: Option<u32>,

    /// Destination directory (defaults to the configured output dir)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Treat the URL as a playlist and download every item
    #[arg(long)]
    playlist: bool,

    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = load_configuration(args.config.as_deref())?;
    validate_config(&config).context("Configuration validation failed")?;

    let dest_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output.dir.clone());

    let extractor = Arc::new(YtDlpExtractor::new(config.extractor.clone()));
    let fetcher = Arc::new(YtDlpFetcher::new(config.fetcher.clone()));
    let transcoder = Arc::new(FfmpegTranscoder::new(config.transcoder.clone()));

    // A missing toolchain is fatal here, before any run starts.
    extractor
        .validate()
        .await
        .context("yt-dlp is not available; install it or set extractor.ytdlp_path")?;
    fetcher
        .validate()
        .await
        .context("yt-dlp is not available; install it or set fetcher.ytdlp_path")?;
    transcoder
        .validate()
        .await
        .context("ffmpeg is not available; install it or set transcoder.ffmpeg_path")?;

    let worker = Worker::new(extractor, fetcher, transcoder);

    let format = args.format.as_str().to_string();
    let request = if args.playlist {
        WorkRequest::Playlist {
            source_url: args.url.clone(),
            format,
            quality_kbps: args.quality,
            dest_dir,
        }
    } else {
        WorkRequest::Single(MediaRequest {
            source_url: args.url.clone(),
            format,
            quality_kbps: args.quality,
            dest_dir,
        })
    };

    info!(url = %args.url, "Starting run");
    let mut handle = worker.submit(request)?;

    // Ctrl+C aborts the in-flight run; the worker cleans up and still
    // delivers its terminal event.
    let cancel = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling run");
            cancel.cancel();
        }
    });

    let mut bar: Option<ProgressBar> = None;
    let mut failure: Option<String> = None;

    while let Some(event) = handle.next_event().await {
        match event {
            RunEvent::Progress(percent) => {
                let bar = bar.get_or_insert_with(|| {
                    let bar = ProgressBar::new(100);
                    bar.set_style(
                        ProgressStyle::with_template(
                            "{bar:40.cyan/blue} {pos:>3}% ({elapsed})",
                        )
                        .expect("static template must parse"),
                    );
                    bar
                });
                bar.set_position(u64::from(percent));
            }
            RunEvent::Completed { success, message, .. } => {
                if let Some(bar) = bar.take() {
                    bar.finish_and_clear();
                }
                if success {
                    info!("{message}");
                    println!("{message}");
                } else {
                    failure = Some(message);
                }
            }
        }
    }

    if let Some(message) = failure {
        bail!("{message}");
    }
    Ok(())
}

/// Resolves the configuration: an explicit flag, then the `TAPEDECK_CONFIG`
/// environment variable, then `tapedeck.toml` in the working directory,
/// then built-in defaults. Only explicitly named files are required to
/// exist.
fn load_configuration(flag: Option<&Path>) -> Result<Config> {
    if let Some(path) = flag {
        info!("Loading configuration from {:?}", path);
        return load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    if let Ok(path) = std::env::var("TAPEDECK_CONFIG") {
        let path = PathBuf::from(path);
        info!("Loading configuration from {:?}", path);
        return load_config(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    let default_path = Path::new("tapedeck.toml");
    if default_path.exists() {
        info!("Loading configuration from {:?}", default_path);
        return load_config(default_path).context("Failed to load tapedeck.toml");
    }
    Ok(Config::default())
}
