//! Text utilities: sentence segmentation, word counting and stopwords.
//!
//! Segmentation is a capability behind [`SentenceSegmenter`] so a
//! language-aware splitter can be swapped in; [`RuleSegmenter`] is the
//! deterministic default.

mod segment;
mod stopwords;
mod tokenize;

pub use segment::{RuleSegmenter, SentenceSegmenter};
pub use stopwords::is_stopword;
pub use tokenize::{content_words, normalize_whitespace, word_count, words};
