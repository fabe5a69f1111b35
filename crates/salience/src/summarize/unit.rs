//! Indexed, scored text units.

use crate::text::word_count;

/// Anything with a size that counts against a budget.
pub trait Weighted {
    /// Size of the item in budget units (words).
    fn weight(&self) -> usize;
}

impl<T: Weighted + ?Sized> Weighted for &T {
    fn weight(&self) -> usize {
        (**self).weight()
    }
}

/// An atomic piece of content (a sentence or a question) with its original
/// position in the document.
///
/// `index` and `text` never change after construction; only the score is
/// assigned later by a scoring policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    index: usize,
    text: String,
    words: usize,
    score: Option<f64>,
}

impl Unit {
    /// Create an unscored unit.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let words = word_count(&text);
        Self {
            index,
            text,
            words,
            score: None,
        }
    }

    /// Set the score while building.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Original position in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = Some(score);
    }

    /// Number of word tokens in the text.
    pub fn word_count(&self) -> usize {
        self.words
    }
}

impl Weighted for Unit {
    fn weight(&self) -> usize {
        self.words
    }
}

/// Wrap sentences as units indexed by their position.
pub fn units_from_sentences<I, S>(sentences: I) -> Vec<Unit>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    sentences
        .into_iter()
        .enumerate()
        .map(|(i, s)| Unit::new(i, s))
        .collect()
}

/// Join unit texts with single spaces, in the order given.
pub fn join_units(units: &[Unit]) -> String {
    units
        .iter()
        .map(Unit::text)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_counts_words_once() {
        let unit = Unit::new(3, "Fifty-eight patients were randomized.");
        assert_eq!(unit.index(), 3);
        assert_eq!(unit.word_count(), 5);
        assert_eq!(unit.weight(), 5);
        assert_eq!(unit.score(), None);
    }

    #[test]
    fn test_score_is_mutable() {
        let mut unit = Unit::new(0, "text").with_score(0.5);
        unit.set_score(0.9);
        assert_eq!(unit.score(), Some(0.9));
        assert_eq!(unit.text(), "text");
    }

    #[test]
    fn test_units_from_sentences_and_join() {
        let units = units_from_sentences(["A b.", "C d."]);
        assert_eq!(units[1].index(), 1);
        assert_eq!(join_units(&units), "A b. C d.");
        assert_eq!(join_units(&[]), "");
    }
}
