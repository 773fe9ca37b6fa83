/// Tokenize text into lower-cased terms split on whitespace.
///
/// Tokens are otherwise taken verbatim: punctuation stays attached and no
/// stemming or stop-word removal is applied, so `"dog,"` and `"dog"` are
/// different terms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
