//! Sentence-bounded splitting of oversized body paragraphs.

use regex::Regex;
use std::sync::OnceLock;

/// A sentence boundary is `.`, `!` or `?` followed by whitespace. The whitespace belongs to
/// neither sentence.
fn sentence_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("static regex"))
}

/// Byte spans `(start, end)` of every sentence in `text`, in order.
///
/// `text` must already be trimmed; the final sentence runs to the end of the text whether or
/// not it is terminated by punctuation.
pub fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for boundary in sentence_boundary_re().find_iter(text) {
        // Punctuation is a single ASCII byte, so `start() + 1` is a char boundary.
        spans.push((start, boundary.start() + 1));
        start = boundary.end();
    }
    if start < text.len() {
        spans.push((start, text.len()));
    }
    spans
}

/// Splits a body block into chunks of at most `max_chars` characters, breaking only between
/// sentences.
///
/// Sentences are accumulated greedily; when appending the next sentence (and the whitespace
/// before it) would take the chunk over budget, the chunk is closed and the sentence starts a
/// new one. Chunks are slices of the trimmed input, so the text between sentences is kept
/// verbatim. A single sentence longer than the budget becomes its own oversized chunk; nothing
/// is truncated or dropped.
pub fn split_paragraph(block: &str, max_chars: usize) -> Vec<&str> {
    let block = block.trim();
    if block.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    // (chunk start byte, chunk end byte, chunk length in chars)
    let mut current: Option<(usize, usize, usize)> = None;

    for (start, end) in sentence_spans(block) {
        let sentence_chars = block[start..end].chars().count();
        current = Some(match current {
            None => (start, end, sentence_chars),
            Some((chunk_start, chunk_end, chunk_chars)) => {
                let gap_chars = block[chunk_end..start].chars().count();
                let candidate = chunk_chars + gap_chars + sentence_chars;
                if candidate > max_chars {
                    chunks.push(&block[chunk_start..chunk_end]);
                    (start, end, sentence_chars)
                } else {
                    (chunk_start, end, candidate)
                }
            }
        });
    }

    if let Some((chunk_start, chunk_end, _)) = current {
        chunks.push(&block[chunk_start..chunk_end]);
    }
    chunks
}
