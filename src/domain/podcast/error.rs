use crate::error::AppError;

/// Fatal pipeline errors. Everything else degrades with a warning
/// (see `PipelineWarning` in the model).
#[derive(Debug, thiserror::Error)]
pub enum PodcastError {
    #[error("input text is empty after sanitization")]
    EmptyInput,

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("no audio produced: every segment failed synthesis; check connectivity to the synthesis service")]
    NoAudioProduced,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<PodcastError> for AppError {
    fn from(err: PodcastError) -> Self {
        match err {
            PodcastError::EmptyInput | PodcastError::InvalidConfig(_) => {
                AppError::BadRequest(err.to_string())
            }
            PodcastError::NoAudioProduced => AppError::ExternalService(err.to_string()),
            PodcastError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}

/// Chunker misconfiguration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("max chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Per-segment synthesis failures. Non-fatal to the pipeline: the
/// orchestrator drops the segment and continues.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("synthesis service unreachable: {0}")]
    Network(String),

    #[error("language not supported by provider: {0}")]
    UnsupportedLanguage(String),

    #[error("segment text is empty")]
    EmptyInput,

    #[error("could not store synthesized audio: {0}")]
    Io(String),
}

/// Stitching can only hard-fail when handed nothing to stitch. Any
/// toolchain failure is reported through `StitchResult::FallbackFirstSegment`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StitchError {
    #[error("no audio segments to stitch")]
    NoSegments,
}

/// Post-processing failures. Callers keep the unmodified input path;
/// the error carries diagnostics for the log only.
#[derive(Debug, thiserror::Error)]
pub enum PostProcessError {
    #[error("audio tool unavailable: {0}")]
    ToolUnavailable(String),

    #[error("audio tool failed: {0}")]
    CommandFailed(String),
}
