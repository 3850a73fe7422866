//! Sentence-window chunking of normalized text.
//!
//! Sentences are split on `.`, `!`, or `?` immediately followed by
//! whitespace. This is a heuristic, not a tokenizer: abbreviations and
//! quoted punctuation will mis-split, while decimals like "3.14" stay
//! intact because no whitespace follows the dot. Chunk ordering is the
//! implicit key into the vector index, so the whole module must be
//! deterministic for identical inputs.

use crate::error::AppError;

/// Default sentences-per-chunk window.
pub const DEFAULT_CHUNK_SIZE: usize = 4;

/// Split `text` into sentences on terminal punctuation followed by
/// whitespace. The punctuation stays with its sentence; the whitespace run
/// between sentences is consumed. A trailing fragment without terminal
/// punctuation is kept as a final sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    // True while consuming the whitespace run that follows a boundary.
    let mut in_break = false;

    for (i, ch) in text.char_indices() {
        if in_break {
            if ch.is_whitespace() {
                continue;
            }
            start = i;
            in_break = false;
        }
        if matches!(ch, '.' | '!' | '?') {
            let rest = &text[i + ch.len_utf8()..];
            if rest.starts_with(|c: char| c.is_whitespace()) {
                sentences.push(text[start..i + ch.len_utf8()].to_string());
                in_break = true;
            }
        }
    }

    if !in_break && start < text.len() {
        let tail = &text[start..];
        if !tail.trim().is_empty() {
            sentences.push(tail.to_string());
        }
    }

    sentences
}

/// Group sentences into consecutive windows of `chunk_size`, joining each
/// window with a single space. The final window may be short; nothing is
/// padded or dropped. Empty input yields an empty chunk list.
pub fn chunk_text(text: &str, chunk_size: usize) -> Result<Vec<String>, AppError> {
    if chunk_size == 0 {
        return Err(AppError::new(
            "CHUNK_SIZE_INVALID",
            "chunk_size must be at least 1",
        ));
    }

    let sentences = split_sentences(text);
    let mut chunks = Vec::with_capacity(sentences.len().div_ceil(chunk_size));
    for window in sentences.chunks(chunk_size) {
        chunks.push(window.join(" ").trim().to_string());
    }
    Ok(chunks)
}
