use super::tts_repository::TtsRepository;
use crate::domain::podcast::error::SynthesisError;
use crate::domain::tts::LanguageCode;
use async_trait::async_trait;
use reqwest::StatusCode;

/// The unofficial Google Translate TTS endpoint rejects long inputs,
/// so segments are re-split into short requests at word boundaries
const MAX_REQUEST_CHARS: usize = 200;

const ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Google Translate TTS implementation of the TTS repository.
/// Default provider; needs no credentials.
pub struct GoogleTtsRepository {
    client: reqwest::Client,
}

impl GoogleTtsRepository {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Split a segment into request-sized pieces at word boundaries.
    /// A single word longer than the limit is sent whole.
    fn split_into_requests(text: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut current_chars = 0usize;

        for word in text.split_whitespace() {
            let word_chars = word.chars().count();
            if !current.is_empty() && current_chars + 1 + word_chars > MAX_REQUEST_CHARS {
                pieces.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_chars += 1;
            }
            current.push_str(word);
            current_chars += word_chars;
        }
        if !current.is_empty() {
            pieces.push(current);
        }

        pieces
    }

    async fn fetch_piece(
        &self,
        piece: &str,
        language: LanguageCode,
    ) -> Result<Vec<u8>, SynthesisError> {
        let url = format!(
            "{}?ie=UTF-8&client=tw-ob&tl={}&q={}",
            ENDPOINT,
            language.as_str(),
            urlencoding::encode(piece)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        // The endpoint 404s on language codes it does not speak
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SynthesisError::UnsupportedLanguage(language.to_string()));
        }

        let response = response
            .error_for_status()
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<Vec<u8>, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyInput);
        }

        let pieces = Self::split_into_requests(text);
        tracing::debug!(
            piece_count = pieces.len(),
            text_length = text.len(),
            language = %language,
            "Synthesizing segment via Google TTS"
        );

        // MP3 frame streams concatenate cleanly, so the per-request
        // responses are merged by appending bytes in order
        let mut merged_audio = Vec::new();
        for (index, piece) in pieces.iter().enumerate() {
            let audio = self.fetch_piece(piece, language).await?;
            merged_audio.extend(audio);
            tracing::trace!(
                piece_index = index,
                total_audio_size = merged_audio.len(),
                "Piece synthesized"
            );
        }

        Ok(merged_audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_short_text_is_single_request() {
        let pieces = GoogleTtsRepository::split_into_requests("A short sentence.");
        assert_eq!(pieces, vec!["A short sentence.".to_string()]);
    }

    #[test]
    fn test_split_respects_request_limit() {
        let text = "word ".repeat(200);
        let pieces = GoogleTtsRepository::split_into_requests(&text);

        assert!(pieces.len() > 1);
        for piece in &pieces {
            assert!(piece.chars().count() <= MAX_REQUEST_CHARS);
        }
    }

    #[test]
    fn test_split_preserves_words() {
        let text = "alpha beta gamma ".repeat(50);
        let pieces = GoogleTtsRepository::split_into_requests(&text);

        let original: Vec<&str> = text.split_whitespace().collect();
        let rejoined = pieces.join(" ");
        let reconstructed: Vec<&str> = rejoined.split_whitespace().collect();
        assert_eq!(original, reconstructed);
    }

    #[test]
    fn test_split_keeps_oversized_word_whole() {
        let long_word = "x".repeat(MAX_REQUEST_CHARS + 50);
        let pieces = GoogleTtsRepository::split_into_requests(&long_word);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0], long_word);
    }
}
