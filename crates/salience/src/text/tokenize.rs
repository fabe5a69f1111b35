//! Word tokenization used for budgets and similarity.

use once_cell::sync::Lazy;
use regex::Regex;

use super::stopwords::is_stopword;

// Words keep inner hyphens, apostrophes and decimal points; every other
// non-space character is a token of its own, so "(p = 0.049)." is six tokens.
static WORD_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}_]+(?:[-'\u{2019}.,][\p{L}\p{N}_]+)*|\.\.\.|[^\p{L}\p{N}_\s]").unwrap()
});

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace<T: AsRef<str>>(text: T) -> String {
    let mut normalized = String::new();
    let mut seen_space = false;
    for ch in text.as_ref().chars() {
        if ch.is_whitespace() {
            if !seen_space {
                normalized.push(' ');
                seen_space = true;
            }
        } else {
            normalized.push(ch);
            seen_space = false;
        }
    }
    normalized.trim().to_string()
}

/// Tokens of `text`: words and standalone punctuation marks.
pub fn words(text: &str) -> Vec<&str> {
    WORD_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Number of tokens in `text`; this is the weight used by word budgets.
pub fn word_count(text: &str) -> usize {
    WORD_TOKEN.find_iter(text).count()
}

/// Lowercased alphanumeric tokens with stopwords removed.
pub fn content_words(text: &str) -> Vec<String> {
    WORD_TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().any(char::is_alphanumeric) && !is_stopword(w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("Alpha\n\n  Beta\tGamma "), "Alpha Beta Gamma");
    }

    #[test]
    fn test_punctuation_counts_as_tokens() {
        assert_eq!(words("(p = 0.049)."), vec!["(", "p", "=", "0.049", ")", "."]);
        assert_eq!(word_count("Hello, world."), 4);
    }

    #[test]
    fn test_inner_hyphens_and_apostrophes_stay_in_word() {
        assert_eq!(word_count("non-small cell patient's levels"), 4);
        assert_eq!(word_count("one two three"), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_content_words_drop_stopwords_and_punctuation() {
        let words = content_words("The patients were randomized, and the trial ended.");
        assert_eq!(words, vec!["patients", "randomized", "trial", "ended"]);
    }
}
