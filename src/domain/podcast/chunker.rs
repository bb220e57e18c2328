use super::error::ChunkError;
use super::model::TextSegment;

/// Split sanitized text into TTS-sized segments, breaking only at
/// sentence boundaries (`.`, `!`, `?` followed by whitespace).
///
/// Sentences are accumulated greedily; when the next sentence would push
/// a segment past `max_chunk_chars` the segment is closed and a new one
/// starts. A single sentence longer than the limit becomes its own
/// oversized segment: mid-sentence splits produce worse speech, so the
/// limit violation is accepted there.
///
/// Empty or whitespace-only input yields an empty sequence.
pub fn chunk(text: &str, max_chunk_chars: usize) -> Result<Vec<TextSegment>, ChunkError> {
    if max_chunk_chars == 0 {
        return Err(ChunkError::InvalidChunkSize);
    }

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    // Sentence unit = everything up to and including the next terminator run
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

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for sentence in sentences {
        let sentence_chars = sentence.chars().count();
        if !current.is_empty() && current_chars + sentence_chars > max_chunk_chars {
            chunks.push(current.trim().to_string());
            current.clear();
            current_chars = 0;
        }
        current.push_str(sentence);
        current_chars += sentence_chars;
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }

    Ok(chunks
        .into_iter()
        .filter(|chunk| !chunk.is_empty())
        .enumerate()
        .map(|(i, text)| TextSegment { index: i + 1, text })
        .collect())
}
