use super::tts_repository::TtsRepository;
use crate::domain::podcast::error::SynthesisError;
use crate::domain::tts::LanguageCode;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// AWS Polly implementation of the TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Select the appropriate neural Polly voice for a language
    fn get_voice_for_language(language: LanguageCode) -> &'static str {
        match language {
            LanguageCode::English => "Joanna",
            LanguageCode::Spanish => "Lupe",
            LanguageCode::French => "Lea",
            LanguageCode::German => "Vicki",
            LanguageCode::Italian => "Bianca",
            LanguageCode::Portuguese => "Ines",
        }
    }

    /// Re-split a pipeline segment into Polly-sized batches. Segments
    /// arrive already cut at sentence boundaries, but the pipeline's
    /// chunk limit can exceed Polly's, and oversized sentences pass
    /// through whole. Polly hard-rejects long inputs, so unlike the
    /// pipeline chunker this split falls back to cutting by characters
    /// when a single sentence is over the limit.
    fn split_into_batches(text: &str) -> Vec<String> {
        if text.chars().count() <= MAX_BATCH_SIZE {
            return vec![text.to_string()];
        }

        let boundary = regex::Regex::new(r"[.!?]+\s+").unwrap();
        let mut sentences: Vec<&str> = Vec::new();
        let mut last_end = 0;
        for mat in boundary.find_iter(text) {
            sentences.push(&text[last_end..mat.end()]);
            last_end = mat.end();
        }
        if last_end < text.len() {
            sentences.push(&text[last_end..]);
        }

        let mut batches = Vec::new();
        let mut current = String::new();
        let mut current_chars = 0usize;

        for sentence in sentences {
            let sentence_chars = sentence.chars().count();
            if !current.is_empty() && current_chars + sentence_chars > MAX_BATCH_SIZE {
                batches.push(current.trim().to_string());
                current.clear();
                current_chars = 0;
            }

            if sentence_chars > MAX_BATCH_SIZE {
                // Hard provider limit: cut the sentence by characters
                let chars: Vec<char> = sentence.chars().collect();
                for piece in chars.chunks(MAX_BATCH_SIZE) {
                    batches.push(piece.iter().collect::<String>().trim().to_string());
                }
            } else {
                current.push_str(sentence);
                current_chars += sentence_chars;
            }
        }
        if !current.trim().is_empty() {
            batches.push(current.trim().to_string());
        }

        batches.retain(|batch| !batch.is_empty());
        batches
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<Vec<u8>, SynthesisError> {
        let voice_name = Self::get_voice_for_language(language);
        let voice_id = VoiceId::from(voice_name);

        tracing::debug!(
            language = %language,
            voice = voice_name,
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(Engine::Neural)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    language = %language,
                    voice = voice_name,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                SynthesisError::Network(format!("AWS Polly error: {e}"))
            })?;

        let audio_stream = result
            .audio_stream
            .collect()
            .await
            .map_err(|e| SynthesisError::Network(format!("failed to read audio stream: {e}")))?;

        Ok(audio_stream.into_bytes().to_vec())
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<Vec<u8>, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyInput);
        }

        let batches = Self::split_into_batches(text);
        tracing::debug!(
            batch_count = batches.len(),
            text_length = text.len(),
            "Segment split into Polly batches"
        );

        let mut merged_audio = Vec::new();
        for batch in &batches {
            let audio = self.call_polly(batch, language).await?;
            merged_audio.extend(audio);
        }

        Ok(merged_audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_small_text_is_single_batch() {
        let text = "This is a short text.";
        let batches = PollyTtsRepository::split_into_batches(text);
        assert_eq!(batches, vec![text.to_string()]);
    }

    #[test]
    fn test_split_respects_max_size() {
        let sentence = "This is a sentence. ";
        let text = sentence.repeat(300);
        let batches = PollyTtsRepository::split_into_batches(&text);

        assert!(batches.len() > 1);
        for batch in &batches {
            assert!(
                batch.chars().count() <= MAX_BATCH_SIZE,
                "batch size {} exceeds limit",
                batch.chars().count()
            );
        }
    }

    #[test]
    fn test_split_cuts_oversized_sentence_by_characters() {
        let text = "a".repeat(MAX_BATCH_SIZE + 500);
        let batches = PollyTtsRepository::split_into_batches(&text);

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), MAX_BATCH_SIZE);
        assert_eq!(batches[1].len(), 500);
    }

    #[test]
    fn test_split_preserves_words() {
        let sentence = "This is sentence number X. ";
        let text = sentence.repeat(200);
        let batches = PollyTtsRepository::split_into_batches(&text);

        let rejoined = batches.join(" ");
        let original_words: Vec<&str> = text.split_whitespace().collect();
        let reconstructed_words: Vec<&str> = rejoined.split_whitespace().collect();
        assert_eq!(original_words, reconstructed_words);
    }

    #[test]
    fn test_voice_selection_per_language() {
        assert_eq!(
            PollyTtsRepository::get_voice_for_language(LanguageCode::English),
            "Joanna"
        );
        assert_eq!(
            PollyTtsRepository::get_voice_for_language(LanguageCode::Portuguese),
            "Ines"
        );
    }
}
