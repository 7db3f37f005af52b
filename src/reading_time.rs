//! Word count and reading-time estimation for article plain text.

/// Words read per minute, the divisor for reading-time estimation.
const WORDS_PER_MINUTE: u32 = 200;

/// Count the words in a plain-text body.
///
/// Tokenizes on runs of whitespace and discards empty tokens. An empty
/// string yields zero.
pub fn word_count(plain_text: &str) -> u32 {
    plain_text.split_whitespace().count() as u32
}

/// Estimate reading time in whole minutes from a plain-text body.
///
/// `minutes = max(1, ceil(words / 200))`. Empty input reports 1 minute:
/// the floor is intentional and relied upon by consumers, so even an empty
/// article never shows "0 min read".
pub fn estimate_reading_minutes(plain_text: &str) -> u32 {
    let words = word_count(plain_text);
    reading_minutes_for_words(words)
}

/// Reading minutes for an already-computed word count.
pub fn reading_minutes_for_words(words: u32) -> u32 {
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}
