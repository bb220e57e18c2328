use async_trait::async_trait;
use blogcast_backend::domain::podcast::{
    PipelineConfig, PipelineWarning, PodcastError, PodcastService, SynthesisError,
};
use blogcast_backend::domain::tts::LanguageCode;
use blogcast_backend::infrastructure::audio::AudioToolchain;
use blogcast_backend::infrastructure::repositories::TtsRepository;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Scripted TTS stand-in: call N returns 1024 bytes of value N, and
/// the listed call numbers fail with a network error.
struct ScriptedTts {
    calls: AtomicUsize,
    failing_calls: Vec<usize>,
}

impl ScriptedTts {
    fn new(failing_calls: Vec<usize>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing_calls,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsRepository for ScriptedTts {
    async fn synthesize(
        &self,
        _text: &str,
        _language: LanguageCode,
    ) -> Result<Vec<u8>, SynthesisError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_calls.contains(&call) {
            return Err(SynthesisError::Network("connection refused".to_string()));
        }
        Ok(vec![call as u8; 1024])
    }
}

/// A toolchain pointing at binaries that do not exist: every merge and
/// post-processing attempt fails, which is exactly what the degradation
/// scenarios need.
fn broken_toolchain() -> Arc<AudioToolchain> {
    Arc::new(AudioToolchain::new(
        "/nonexistent/ffmpeg",
        "/nonexistent/ffprobe",
    ))
}

fn pipeline_config(speed: f32) -> PipelineConfig {
    PipelineConfig {
        language: LanguageCode::English,
        speed_factor: speed,
        max_chunk_chars: 4500,
        inter_segment_silence_millis: 500,
    }
}

/// Sentence-terminated filler text of roughly `total_chars` characters
fn sentences(total_chars: usize) -> String {
    let sentence = "This is sentence number one. ";
    sentence
        .repeat(total_chars / sentence.len())
        .trim_end()
        .to_string()
}

fn scratch_entries(scratch: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(scratch)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

#[tokio::test]
async fn it_should_produce_a_clean_podcast_from_a_single_segment() {
    // 3000 chars against a 4500 limit is one segment, one
    // synthesis call, trivially merged.
    let scratch = tempfile::tempdir().unwrap();
    let tts = Arc::new(ScriptedTts::new(vec![]));
    let service = PodcastService::new(
        tts.clone(),
        broken_toolchain(),
        scratch.path().to_path_buf(),
    );

    let text = sentences(3000);
    let podcast = service
        .generate(&text, &pipeline_config(1.0), None, None)
        .await
        .unwrap();

    assert_eq!(tts.call_count(), 1);
    assert_eq!(podcast.segment_count, 1);
    assert!(!podcast.degraded);
    assert!(!podcast
        .warnings
        .iter()
        .any(|w| matches!(w, PipelineWarning::StitchDegraded)));
    // Speed 1.0 is a no-op, so no speed warning even without ffmpeg
    assert!(!podcast
        .warnings
        .iter()
        .any(|w| matches!(w, PipelineWarning::SpeedAdjustmentSkipped { .. })));

    // Output is the synthesized segment itself
    let bytes = std::fs::read(&podcast.path).unwrap();
    assert_eq!(bytes, vec![1u8; 1024]);

    // Duration falls back to the reading-speed estimate
    let expected = text.chars().count() as f64 / 1000.0 * 60.0;
    assert!((podcast.duration_seconds - expected).abs() < 0.1);

    // The run directory is gone; only the final artifact remains
    assert_eq!(scratch_entries(scratch.path()), vec![podcast.path.clone()]);
}

#[tokio::test]
async fn it_should_continue_when_one_segment_fails_synthesis() {
    // 10000 chars chunk into three segments; the second
    // fails and is dropped, the rest still become a podcast.
    let scratch = tempfile::tempdir().unwrap();
    let tts = Arc::new(ScriptedTts::new(vec![2]));
    let service = PodcastService::new(
        tts.clone(),
        broken_toolchain(),
        scratch.path().to_path_buf(),
    );

    let text = sentences(10_000);
    let podcast = service
        .generate(&text, &pipeline_config(1.0), None, None)
        .await
        .unwrap();

    assert_eq!(tts.call_count(), 3);
    assert_eq!(podcast.segment_count, 2);
    assert!(podcast.warnings.iter().any(|w| matches!(
        w,
        PipelineWarning::SegmentSynthesisFailed { index: 2, .. }
    )));
    assert!(podcast.path.exists());
}

#[tokio::test]
async fn it_should_fail_with_no_audio_when_every_segment_fails() {
    // All synthesis attempts fail; no output file is left
    let scratch = tempfile::tempdir().unwrap();
    let tts = Arc::new(ScriptedTts::new(vec![1, 2, 3]));
    let service = PodcastService::new(
        tts.clone(),
        broken_toolchain(),
        scratch.path().to_path_buf(),
    );

    let text = sentences(10_000);
    let result = service
        .generate(&text, &pipeline_config(1.0), None, None)
        .await;

    assert!(matches!(result, Err(PodcastError::NoAudioProduced)));
    assert_eq!(tts.call_count(), 3);
    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn it_should_fall_back_to_first_segment_when_merge_is_unavailable() {
    // Two good segments but no merge tool; the caller gets
    // segment one's audio with the degraded flag set.
    let scratch = tempfile::tempdir().unwrap();
    let tts = Arc::new(ScriptedTts::new(vec![]));
    let service = PodcastService::new(
        tts.clone(),
        broken_toolchain(),
        scratch.path().to_path_buf(),
    );

    let text = sentences(6000);
    let podcast = service
        .generate(&text, &pipeline_config(1.0), None, None)
        .await
        .unwrap();

    assert_eq!(tts.call_count(), 2);
    assert!(podcast.degraded);
    assert!(podcast
        .warnings
        .iter()
        .any(|w| matches!(w, PipelineWarning::StitchDegraded)));

    let bytes = std::fs::read(&podcast.path).unwrap();
    assert_eq!(bytes, vec![1u8; 1024]);

    assert_eq!(scratch_entries(scratch.path()), vec![podcast.path.clone()]);
}

#[tokio::test]
async fn it_should_warn_when_speed_adjustment_is_unavailable() {
    let scratch = tempfile::tempdir().unwrap();
    let service = PodcastService::new(
        Arc::new(ScriptedTts::new(vec![])),
        broken_toolchain(),
        scratch.path().to_path_buf(),
    );

    let podcast = service
        .generate(&sentences(500), &pipeline_config(1.5), None, None)
        .await
        .unwrap();

    assert!(podcast
        .warnings
        .iter()
        .any(|w| matches!(w, PipelineWarning::SpeedAdjustmentSkipped { .. })));
    // Degradation is about stitching only; a skipped speed step does
    // not flag the podcast as degraded
    assert!(!podcast.degraded);
}

#[tokio::test]
async fn it_should_reject_empty_input_before_synthesizing() {
    let scratch = tempfile::tempdir().unwrap();
    let tts = Arc::new(ScriptedTts::new(vec![]));
    let service = PodcastService::new(
        tts.clone(),
        broken_toolchain(),
        scratch.path().to_path_buf(),
    );

    let result = service
        .generate("   \n\t  ", &pipeline_config(1.0), None, None)
        .await;

    assert!(matches!(result, Err(PodcastError::EmptyInput)));
    assert_eq!(tts.call_count(), 0);
    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn it_should_reject_a_zero_chunk_size() {
    let scratch = tempfile::tempdir().unwrap();
    let service = PodcastService::new(
        Arc::new(ScriptedTts::new(vec![])),
        broken_toolchain(),
        scratch.path().to_path_buf(),
    );

    let mut config = pipeline_config(1.0);
    config.max_chunk_chars = 0;
    let result = service.generate("Some text.", &config, None, None).await;
    assert!(matches!(result, Err(PodcastError::InvalidConfig(_))));
}

#[tokio::test]
async fn it_should_reject_a_non_positive_speed_factor() {
    let scratch = tempfile::tempdir().unwrap();
    let service = PodcastService::new(
        Arc::new(ScriptedTts::new(vec![])),
        broken_toolchain(),
        scratch.path().to_path_buf(),
    );

    let result = service
        .generate("Some text.", &pipeline_config(0.0), None, None)
        .await;
    assert!(matches!(result, Err(PodcastError::InvalidConfig(_))));
}
