use super::chunker;
use super::error::{PodcastError, SynthesisError};
use super::model::{
    AudioSegment, GeneratedPodcast, PipelineConfig, PipelineWarning, TextSegment,
};
use crate::domain::tts::LanguageCode;
use crate::infrastructure::audio::AudioToolchain;
use crate::infrastructure::repositories::TtsRepository;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Estimated speech rate, used when the audio cannot be probed
const CHARACTERS_PER_MINUTE: f64 = 1000.0;

/// Orchestrates one text-to-podcast run:
/// chunk -> synthesize per segment -> stitch -> speed -> normalize -> tag.
///
/// Only three conditions abort a run: empty input, a misconfigured
/// chunker, and zero successfully synthesized segments. Everything else
/// degrades and is reported through `GeneratedPodcast::warnings`.
pub struct PodcastService {
    tts_repo: Arc<dyn TtsRepository>,
    toolchain: Arc<AudioToolchain>,
    scratch_dir: PathBuf,
}

impl PodcastService {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        toolchain: Arc<AudioToolchain>,
        scratch_dir: PathBuf,
    ) -> Self {
        Self {
            tts_repo,
            toolchain,
            scratch_dir,
        }
    }

    pub async fn generate(
        &self,
        text: &str,
        config: &PipelineConfig,
        title: Option<&str>,
        author: Option<&str>,
    ) -> Result<GeneratedPodcast, PodcastError> {
        if !config.speed_factor.is_finite() || config.speed_factor <= 0.0 {
            return Err(PodcastError::InvalidConfig(format!(
                "speed factor must be positive, got {}",
                config.speed_factor
            )));
        }

        let cleaned = sanitize_text(text);
        if cleaned.is_empty() {
            return Err(PodcastError::EmptyInput);
        }

        let segments = chunker::chunk(&cleaned, config.max_chunk_chars)
            .map_err(|e| PodcastError::InvalidConfig(e.to_string()))?;

        // Each run works in its own scratch directory so concurrent
        // runs never collide
        let run_id = Uuid::new_v4();
        let run_dir = self.scratch_dir.join(format!("run_{run_id}"));
        tokio::fs::create_dir_all(&run_dir)
            .await
            .map_err(|e| anyhow::anyhow!("could not create scratch directory: {e}"))?;

        let result = self
            .run(&run_dir, run_id, segments, config, title, author)
            .await;

        // The run directory goes away on every exit path; on success
        // the final artifact has already been moved out of it
        if let Err(e) = tokio::fs::remove_dir_all(&run_dir).await {
            tracing::debug!(
                run_dir = %run_dir.display(),
                error = %e,
                "could not remove run scratch directory"
            );
        }

        result
    }

    async fn run(
        &self,
        run_dir: &Path,
        run_id: Uuid,
        segments: Vec<TextSegment>,
        config: &PipelineConfig,
        title: Option<&str>,
        author: Option<&str>,
    ) -> Result<GeneratedPodcast, PodcastError> {
        let mut warnings = Vec::new();

        tracing::info!(
            run_id = %run_id,
            segment_count = segments.len(),
            language = %config.language,
            speed = config.speed_factor,
            "Starting podcast generation"
        );

        // Sequential on purpose: the provider is rate-sensitive and
        // stitching needs the segments back in source order
        let mut audio_segments: Vec<AudioSegment> = Vec::new();
        for segment in &segments {
            if segment.text.trim().is_empty() {
                continue;
            }
            match self
                .synthesize_segment(run_dir, segment, config.language)
                .await
            {
                Ok(audio) => audio_segments.push(audio),
                Err(e) => {
                    tracing::warn!(
                        index = segment.index,
                        error = %e,
                        "Segment synthesis failed, dropping segment"
                    );
                    warnings.push(PipelineWarning::SegmentSynthesisFailed {
                        index: segment.index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if audio_segments.is_empty() {
            return Err(PodcastError::NoAudioProduced);
        }
        let segment_count = audio_segments.len();

        let stitch = self
            .toolchain
            .stitch(
                &audio_segments,
                config.inter_segment_silence_millis,
                &run_dir.join("merged.mp3"),
            )
            .await
            .map_err(|_| PodcastError::NoAudioProduced)?;

        let degraded = stitch.is_fallback();
        if degraded {
            warnings.push(PipelineWarning::StitchDegraded);
        }
        let mut current = stitch.path().clone();

        let mut effective_speed = 1.0f64;
        if config.speed_factor != 1.0 {
            match self
                .toolchain
                .adjust_speed(&current, config.speed_factor, &run_dir.join("speed.mp3"))
                .await
            {
                Ok(path) => {
                    current = path;
                    effective_speed = config.speed_factor as f64;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Speed adjustment failed, keeping original pace");
                    warnings.push(PipelineWarning::SpeedAdjustmentSkipped {
                        reason: e.to_string(),
                    });
                }
            }
        }

        match self
            .toolchain
            .normalize(&current, &run_dir.join("normalized.mp3"))
            .await
        {
            Ok(path) => current = path,
            Err(e) => {
                tracing::warn!(error = %e, "Normalization failed, keeping unnormalized audio");
                warnings.push(PipelineWarning::NormalizationSkipped {
                    reason: e.to_string(),
                });
            }
        }

        if let Some(title) = title {
            if let Err(e) = self
                .toolchain
                .tag_metadata(&current, title, author.unwrap_or("Blog to Podcast"))
                .await
            {
                tracing::warn!(error = %e, "Metadata tagging failed");
                warnings.push(PipelineWarning::MetadataTaggingFailed {
                    reason: e.to_string(),
                });
            }
        }

        let duration_seconds = match self.toolchain.probe_duration(&current).await {
            Some(duration) => duration,
            None => {
                estimated_track_millis(
                    &audio_segments,
                    degraded,
                    config.inter_segment_silence_millis,
                ) as f64
                    / 1000.0
                    / effective_speed
            }
        };

        let final_path = self.scratch_dir.join(format!("podcast_{run_id}.mp3"));
        self.promote(&current, &final_path).await?;

        tracing::info!(
            run_id = %run_id,
            path = %final_path.display(),
            duration_seconds,
            segment_count,
            degraded,
            warning_count = warnings.len(),
            "Podcast generated"
        );

        Ok(GeneratedPodcast {
            path: final_path,
            duration_seconds,
            segment_count,
            title: title.map(str::to_string),
            author: author.map(str::to_string),
            degraded,
            warnings,
        })
    }

    async fn synthesize_segment(
        &self,
        run_dir: &Path,
        segment: &TextSegment,
        language: LanguageCode,
    ) -> Result<AudioSegment, SynthesisError> {
        let audio = self.tts_repo.synthesize(&segment.text, language).await?;

        let path = run_dir.join(format!("segment_{}.mp3", segment.index));
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|e| SynthesisError::Io(e.to_string()))?;

        let duration_millis = match self.toolchain.probe_duration(&path).await {
            Some(seconds) => (seconds * 1000.0).round() as u64,
            None => estimated_millis(&segment.text),
        };

        tracing::debug!(
            index = segment.index,
            audio_size = audio.len(),
            duration_millis,
            "Segment synthesized"
        );

        Ok(AudioSegment {
            source_index: segment.index,
            path,
            duration_millis,
        })
    }

    /// Move the finished track out of the run directory. Rename first,
    /// copy across filesystems if that fails.
    async fn promote(&self, current: &Path, final_path: &Path) -> Result<(), PodcastError> {
        if tokio::fs::rename(current, final_path).await.is_ok() {
            return Ok(());
        }
        tokio::fs::copy(current, final_path)
            .await
            .map_err(|e| anyhow::anyhow!("could not move final audio: {e}"))?;
        let _ = tokio::fs::remove_file(current).await;
        Ok(())
    }
}

/// Collapse whitespace, strip control characters, trim
fn sanitize_text(text: &str) -> String {
    let whitespace = regex::Regex::new(r"\s+").unwrap();
    let collapsed = whitespace.replace_all(text, " ");
    let control = regex::Regex::new(r"[\x00-\x1f\x7f-\x{9f}]").unwrap();
    control.replace_all(&collapsed, "").trim().to_string()
}

fn estimated_millis(text: &str) -> u64 {
    let chars = text.chars().count() as f64;
    (chars / CHARACTERS_PER_MINUTE * 60_000.0).round() as u64
}

/// Expected track length from the per-segment measurements: the sum of
/// segment durations plus one silence gap per adjacent pair, or just
/// the first segment on the fallback path.
fn estimated_track_millis(segments: &[AudioSegment], degraded: bool, silence_millis: u64) -> u64 {
    if degraded {
        return segments.first().map(|s| s.duration_millis).unwrap_or(0);
    }
    let total: u64 = segments.iter().map(|s| s.duration_millis).sum();
    total + silence_millis * (segments.len() as u64 - 1)
}
