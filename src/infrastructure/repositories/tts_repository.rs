use crate::domain::podcast::error::SynthesisError;
use crate::domain::tts::LanguageCode;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (Google TTS, AWS Polly, ...)
///
/// Implementations are responsible for:
/// - Handling provider-specific request length limitations
/// - Merging provider responses into a single audio stream
/// - Provider-specific voice selection
///
/// The pipeline hands each implementation one text segment at a time;
/// ordering and stitching across segments happen upstream.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize one text segment to speech for a given language
    ///
    /// Returns MP3 audio bytes for the whole segment.
    async fn synthesize(&self, text: &str, language: LanguageCode)
        -> Result<Vec<u8>, SynthesisError>;
}
