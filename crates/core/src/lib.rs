pub mod batch;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod sanitize;
pub mod sidecar;
pub mod testing;
pub mod transcoder;
pub mod worker;

pub use batch::{BatchOrchestrator, BatchResult};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use extractor::{
    Extractor, ExtractorConfig, ExtractorError, Playlist, ResolvedItem, YtDlpExtractor,
};
pub use fetcher::{FetchError, FetchRequest, FetchedMedia, Fetcher, FetcherConfig, YtDlpFetcher};
pub use pipeline::{
    ErrorKind, ErrorRecord, ItemOutcome, ItemPipeline, ItemStatus, MediaRequest, OutputFormat,
    PipelineError,
};
pub use sanitize::sanitize;
pub use sidecar::{sidecar_path, write_sidecar, SidecarError, SIDECAR_SUFFIX};
pub use transcoder::{
    FfmpegTranscoder, TranscodeJob, TranscodeOutput, TranscodeProfile, Transcoder,
    TranscoderConfig, TranscoderError,
};
pub use worker::{RunEvent, RunHandle, WorkRequest, Worker, WorkerError};
