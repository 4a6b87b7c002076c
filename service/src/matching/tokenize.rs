/// Words that never count as an interest token.
pub const STOP_WORDS: &[&str] = &["the", "and", "of", "to", "for", "on", "with", "a", "an", "in"];

const MIN_TOKEN_CHARS: usize = 3;

/// Split an interest phrase into match tokens.
///
/// Punctuation is dropped (so "health-care" becomes "healthcare"), the rest
/// is lowercased and split on whitespace. Tokens shorter than three
/// characters and [`STOP_WORDS`] are skipped.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|word| {
            word.to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|token| {
            token.chars().count() >= MIN_TOKEN_CHARS && !STOP_WORDS.contains(&token.as_str())
        })
}

/// Count the tokens that occur anywhere in `blob`, case-insensitively.
pub fn score<S: AsRef<str>>(tokens: &[S], blob: &str) -> usize {
    let haystack = blob.to_lowercase();
    tokens
        .iter()
        .filter(|token| haystack.contains(token.as_ref()))
        .count()
}
