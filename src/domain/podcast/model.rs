use crate::domain::tts::LanguageCode;
use serde::Serialize;
use std::path::PathBuf;

/// One bounded-size piece of the sanitized source text. Indexes are
/// 1-based and preserved through synthesis so audio can be reassembled
/// in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub index: usize,
    pub text: String,
}

/// The synthesized audio for one text segment, written to run-scoped
/// scratch storage. Deleted by the stitcher once consumed, unless
/// promoted to the final output on fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSegment {
    pub source_index: usize,
    pub path: PathBuf,
    pub duration_millis: u64,
}

/// Outcome of stitching. `FallbackFirstSegment` means the merge could
/// not be performed and the first segment stands in for the whole
/// track; callers must surface that degradation, never hide it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StitchResult {
    Merged(PathBuf),
    FallbackFirstSegment(PathBuf),
}

impl StitchResult {
    pub fn path(&self) -> &PathBuf {
        match self {
            StitchResult::Merged(path) => path,
            StitchResult::FallbackFirstSegment(path) => path,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, StitchResult::FallbackFirstSegment(_))
    }
}

/// Immutable settings for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub language: LanguageCode,
    pub speed_factor: f32,
    pub max_chunk_chars: usize,
    pub inter_segment_silence_millis: u64,
}

/// Non-fatal events raised while a run proceeds. A run that produced
/// any of these still yields a podcast; the caller decides how loudly
/// to warn the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    SegmentSynthesisFailed { index: usize, reason: String },
    StitchDegraded,
    SpeedAdjustmentSkipped { reason: String },
    NormalizationSkipped { reason: String },
    MetadataTaggingFailed { reason: String },
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineWarning::SegmentSynthesisFailed { index, reason } => {
                write!(f, "segment {} dropped: {}", index, reason)
            }
            PipelineWarning::StitchDegraded => {
                write!(f, "audio merge failed; podcast contains only the first segment")
            }
            PipelineWarning::SpeedAdjustmentSkipped { reason } => {
                write!(f, "speed adjustment skipped: {}", reason)
            }
            PipelineWarning::NormalizationSkipped { reason } => {
                write!(f, "loudness normalization skipped: {}", reason)
            }
            PipelineWarning::MetadataTaggingFailed { reason } => {
                write!(f, "metadata tagging failed: {}", reason)
            }
        }
    }
}

/// Final artifact of a pipeline run. The file at `path` is owned by the
/// caller; every intermediate the run created has already been deleted.
#[derive(Debug, Clone)]
pub struct GeneratedPodcast {
    pub path: PathBuf,
    pub duration_seconds: f64,
    pub segment_count: usize,
    pub title: Option<String>,
    pub author: Option<String>,
    pub degraded: bool,
    pub warnings: Vec<PipelineWarning>,
}
