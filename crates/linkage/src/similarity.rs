//! Token-sort ratio: a word-order-insensitive, edit-sensitive string score
//! in `0..=100`.

use rapidfuzz::fuzz;

/// Lowercase, turn every character that is not alphanumeric or `_` into a
/// space, trim.
pub fn preprocess(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Preprocessed tokens sorted alphabetically and re-joined with one space.
pub fn sort_tokens(s: &str) -> String {
    let processed = preprocess(s);
    let mut tokens: Vec<&str> = processed.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Normalized InDel similarity in `0.0..=100.0`, over chars.
///
/// `100 * (1 - indel / (len_a + len_b))`. Two empty strings are identical
/// (100).
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    fuzz::ratio(a.chars(), b.chars()) * 100.0
}

/// `ratio` rounded half-to-even to an integer score.
pub fn rounded_ratio(a: &str, b: &str) -> u8 {
    ratio(a, b).round_ties_even().clamp(0.0, 100.0) as u8
}

/// Token-sort ratio of two strings.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    rounded_ratio(&sort_tokens(a), &sort_tokens(b))
}
