// file: src/utils/text.rs
// description: whitespace and truncation helpers for abstracts

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keeps the first `max_words` whitespace-delimited tokens, rejoined with single spaces.
/// Text at or under the cap is returned unchanged.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    if word_count(text) <= max_words {
        return text.to_string();
    }
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `max_chars` characters, never splitting a UTF-8 sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
