use crate::domain::podcast::error::{PostProcessError, StitchError};
use crate::domain::podcast::model::{AudioSegment, StitchResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Fallback when probing fails; both providers emit MP3 near this rate
const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Wrapper around the external ffmpeg/ffprobe binaries used for
/// stitching, loudness normalization, speed adjustment and tagging.
///
/// Binary paths are injected so a host without ffmpeg degrades instead
/// of failing: stitching falls back to the first segment and the
/// post-processing steps report a typed error the orchestrator ignores.
pub struct AudioToolchain {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl AudioToolchain {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Whether the ffmpeg binary can be spawned at all
    pub async fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Concatenate audio segments in index order with `silence_millis`
    /// of silence between each consecutive pair.
    ///
    /// A single segment is trivially `Merged` with no toolchain work.
    /// An empty slice is a caller bug and fails with `NoSegments`. Any
    /// toolchain failure yields `FallbackFirstSegment` instead of an
    /// error: a partial podcast is more useful than none.
    ///
    /// Consumed segment files are deleted; the promoted first segment
    /// is kept on the fallback path.
    pub async fn stitch(
        &self,
        segments: &[AudioSegment],
        silence_millis: u64,
        output: &Path,
    ) -> Result<StitchResult, StitchError> {
        let first = segments.first().ok_or(StitchError::NoSegments)?;

        if segments.len() == 1 {
            return Ok(StitchResult::Merged(first.path.clone()));
        }

        match self.concat(segments, silence_millis, output).await {
            Ok(()) => {
                for segment in segments {
                    if let Err(e) = tokio::fs::remove_file(&segment.path).await {
                        tracing::debug!(
                            path = %segment.path.display(),
                            error = %e,
                            "could not remove consumed segment"
                        );
                    }
                }
                Ok(StitchResult::Merged(output.to_path_buf()))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    segment_count = segments.len(),
                    "audio merge failed, falling back to first segment"
                );
                for segment in &segments[1..] {
                    let _ = tokio::fs::remove_file(&segment.path).await;
                }
                Ok(StitchResult::FallbackFirstSegment(first.path.clone()))
            }
        }
    }

    async fn concat(
        &self,
        segments: &[AudioSegment],
        silence_millis: u64,
        output: &Path,
    ) -> Result<(), PostProcessError> {
        let count = segments.len();
        let silence_secs = silence_millis as f64 / 1000.0;

        // Pad every segment but the last with trailing silence, then
        // concat the padded streams.
        let mut graph = String::new();
        for i in 0..count {
            if i < count - 1 && silence_millis > 0 {
                graph.push_str(&format!("[{i}:a]apad=pad_dur={silence_secs}[a{i}];"));
            } else {
                graph.push_str(&format!("[{i}:a]anull[a{i}];"));
            }
        }
        for i in 0..count {
            graph.push_str(&format!("[a{i}]"));
        }
        graph.push_str(&format!("concat=n={count}:v=0:a=1[out]"));

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.arg("-y").args(["-v", "error"]);
        for segment in segments {
            cmd.arg("-i").arg(&segment.path);
        }
        cmd.arg("-filter_complex")
            .arg(graph)
            .args(["-map", "[out]"])
            .arg(output);

        self.run(cmd).await?;

        // An empty output means the encoder bailed without reporting
        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => Ok(()),
            _ => Err(PostProcessError::CommandFailed(
                "merge produced no output".to_string(),
            )),
        }
    }

    /// Loudness-normalize into `output`. The caller keeps the original
    /// path on failure.
    pub async fn normalize(
        &self,
        path: &Path,
        output: &Path,
    ) -> Result<PathBuf, PostProcessError> {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.arg("-y")
            .args(["-v", "error"])
            .arg("-i")
            .arg(path)
            .args(["-af", "loudnorm"])
            .arg(output);
        self.run(cmd).await?;
        Ok(output.to_path_buf())
    }

    /// Resample playback rate by `factor`, changing pitch along with
    /// speed. Factor 1.0 returns the input path without spawning
    /// anything.
    pub async fn adjust_speed(
        &self,
        path: &Path,
        factor: f32,
        output: &Path,
    ) -> Result<PathBuf, PostProcessError> {
        if factor == 1.0 {
            return Ok(path.to_path_buf());
        }

        let rate = self
            .probe_sample_rate(path)
            .await
            .unwrap_or(DEFAULT_SAMPLE_RATE);
        let shifted = (rate as f32 * factor).round() as u32;

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.arg("-y")
            .args(["-v", "error"])
            .arg("-i")
            .arg(path)
            .args(["-af", &format!("asetrate={shifted},aresample={rate}")])
            .arg(output);
        self.run(cmd).await?;
        Ok(output.to_path_buf())
    }

    /// Write ID3 title/artist tags in place
    pub async fn tag_metadata(
        &self,
        path: &Path,
        title: &str,
        artist: &str,
    ) -> Result<(), PostProcessError> {
        let tagged = path.with_extension("tagged.mp3");

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.arg("-y")
            .args(["-v", "error"])
            .arg("-i")
            .arg(path)
            .args(["-c", "copy", "-id3v2_version", "3"])
            .args(["-metadata", &format!("title={title}")])
            .args(["-metadata", &format!("artist={artist}")])
            .args(["-metadata", "album=Generated Podcasts"])
            .arg(&tagged);
        self.run(cmd).await?;

        tokio::fs::rename(&tagged, path)
            .await
            .map_err(|e| PostProcessError::CommandFailed(e.to_string()))
    }

    /// Duration in seconds, best-effort
    pub async fn probe_duration(&self, path: &Path) -> Option<f64> {
        self.probe(path, "format=duration")
            .await?
            .parse::<f64>()
            .ok()
    }

    async fn probe_sample_rate(&self, path: &Path) -> Option<u32> {
        self.probe(path, "stream=sample_rate")
            .await?
            .parse::<u32>()
            .ok()
    }

    async fn probe(&self, path: &Path, entry: &str) -> Option<String> {
        let output = Command::new(&self.ffprobe)
            .args(["-v", "error", "-show_entries", entry])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(path)
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!value.is_empty()).then_some(value)
    }

    async fn run(&self, mut cmd: Command) -> Result<(), PostProcessError> {
        let output = cmd
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| PostProcessError::ToolUnavailable(e.to_string()))?;
        if !output.status.success() {
            return Err(PostProcessError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }
}
