//! Rule-based sentence segmentation.

use std::collections::HashSet;

use crate::error::Result;

use super::tokenize::normalize_whitespace;

/// Splits a text into an ordered sequence of sentences.
///
/// Implementations must be deterministic: the same text always yields the
/// same sentences, because sentence positions are used as stable indices.
pub trait SentenceSegmenter: Send + Sync {
    /// Segment `text` into sentences in document order.
    fn segment(&self, text: &str) -> Result<Vec<String>>;
}

/// Tokens that end with a period without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "al", "approx", "ca", "cf", "dept", "dr", "e.g", "eg", "eq", "eqs", "fig", "figs", "i.e",
    "ie", "inc", "jr", "ltd", "mr", "mrs", "ms", "no", "nos", "pp", "prof", "ref", "refs",
    "resp", "sec", "sr", "st", "univ", "viz", "vol", "vs",
];

/// Deterministic English sentence splitter.
///
/// Blank lines always separate sentences. Inside a block, `.`, `!` and `?`
/// end a sentence when followed by whitespace, except after known
/// abbreviations, single-letter initials, or when the next word starts in
/// lowercase. Closing quotes and brackets stay with the sentence they close.
#[derive(Debug, Clone)]
pub struct RuleSegmenter {
    abbreviations: HashSet<String>,
}

impl Default for RuleSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSegmenter {
    /// Create a segmenter with the built-in abbreviation list.
    pub fn new() -> Self {
        Self {
            abbreviations: ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Treat an additional token (without its final period) as an abbreviation.
    pub fn with_abbreviation(mut self, abbreviation: &str) -> Self {
        self.abbreviations
            .insert(abbreviation.trim_end_matches('.').to_lowercase());
        self
    }

    /// Split `text` into sentences.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut results = Vec::new();

        for block in text.split("\n\n") {
            let normalized = normalize_whitespace(block);
            if normalized.is_empty() {
                continue;
            }
            self.push_block_sentences(&normalized, &mut results);
        }

        results
    }

    fn push_block_sentences(&self, block: &str, results: &mut Vec<String>) {
        let chars: Vec<char> = block.chars().collect();
        let mut start = 0;
        let mut idx = 0;

        while idx < chars.len() {
            if !is_terminator(chars[idx]) {
                idx += 1;
                continue;
            }

            let mut end = idx + 1;
            while end < chars.len() && (is_terminator(chars[end]) || is_closer(chars[end])) {
                end += 1;
            }

            if self.is_boundary(&chars, idx, end) {
                push_trimmed(&chars[start..end], results);
                start = end;
            }
            idx = end;
        }

        push_trimmed(&chars[start..], results);
    }

    /// `chars[idx..end]` is a run of terminators and closers.
    fn is_boundary(&self, chars: &[char], idx: usize, end: usize) -> bool {
        if end < chars.len() && !chars[end].is_whitespace() {
            return false;
        }

        let next = next_word_start(chars, end);
        let run = &chars[idx..end];

        if run.iter().any(|c| *c == '!' || *c == '?') {
            return true;
        }

        let dots = run.iter().filter(|c| **c == '.').count();
        if dots > 1 {
            // Ellipsis: only a boundary when a new sentence visibly starts.
            return next.is_none_or(|c| c.is_uppercase());
        }

        if next.is_some_and(|c| c.is_lowercase()) {
            return false;
        }

        let word = word_before(chars, idx);
        if word.chars().count() == 1 && word.chars().all(|c| c.is_uppercase()) {
            return false;
        }

        !self.abbreviations.contains(&word.to_lowercase())
    }
}

impl SentenceSegmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.split(text))
    }
}

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

fn is_closer(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
}

/// The token directly preceding position `idx`, including inner periods.
fn word_before(chars: &[char], idx: usize) -> String {
    let mut begin = idx;
    while begin > 0 && (chars[begin - 1].is_alphanumeric() || chars[begin - 1] == '.') {
        begin -= 1;
    }
    chars[begin..idx]
        .iter()
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

fn next_word_start(chars: &[char], from: usize) -> Option<char> {
    chars[from..]
        .iter()
        .copied()
        .find(|c| !c.is_whitespace() && !matches!(c, '"' | '\'' | '(' | '[' | '\u{201c}'))
}

fn push_trimmed(chars: &[char], results: &mut Vec<String>) {
    let sentence: String = chars.iter().collect();
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        results.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        RuleSegmenter::new().split(text)
    }

    #[test]
    fn test_splits_on_terminators() {
        let sentences = split("The trial ran. It worked! Did it replicate? Unknown");
        assert_eq!(
            sentences,
            vec!["The trial ran.", "It worked!", "Did it replicate?", "Unknown"]
        );
    }

    #[test]
    fn test_empty_text_has_no_sentences() {
        assert!(split("").is_empty());
        assert!(split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_keeps_decimals_and_abbreviations() {
        let sentences =
            split("Levels fell by 25.71 % in the control group, e.g. in Fig. 2 of the paper. Done.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("25.71"));
        assert!(sentences[0].ends_with("paper."));
    }

    #[test]
    fn test_keeps_initials_and_et_al() {
        let sentences = split("As shown by J. Smith et al. the effect holds. Next sentence.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1], "Next sentence.");
    }

    #[test]
    fn test_closing_quote_stays_with_sentence() {
        let sentences = split("He said \"stop.\" Then he left.");
        assert_eq!(sentences, vec!["He said \"stop.\"", "Then he left."]);
    }

    #[test]
    fn test_blank_lines_separate_blocks() {
        let sentences = split("Heading without period\n\nBody text here.\nStill body.");
        assert_eq!(
            sentences,
            vec!["Heading without period", "Body text here.", "Still body."]
        );
    }

    #[test]
    fn test_custom_abbreviation() {
        let segmenter = RuleSegmenter::new().with_abbreviation("Tab.");
        let sentences = segmenter.split("See Tab. 3 for details. Then stop.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_segment_is_deterministic() {
        let segmenter = RuleSegmenter::new();
        let text = "One. Two. Three...  Four? Five!";
        assert_eq!(
            segmenter.segment(text).unwrap(),
            segmenter.segment(text).unwrap()
        );
    }
}
