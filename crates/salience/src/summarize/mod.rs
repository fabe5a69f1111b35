//! Summarization: extractive baselines under a word budget and abstractive
//! summaries from a generation service.
//!
//! # Example
//!
//! ```
//! use salience::summarize::{summarize_greedy, summarize_lead_words};
//!
//! let text = "The trial enrolled 54 patients. Half received a supplement. \
//!             Complications were less frequent in the supplement group.";
//!
//! assert_eq!(
//!     summarize_lead_words(text, 6).unwrap(),
//!     "The trial enrolled 54 patients."
//! );
//! assert_eq!(summarize_greedy(text, 5).unwrap(), "Half received a supplement.");
//! ```

mod baselines;
mod budget;
mod llm;
mod textrank;
mod unit;

pub use baselines::{
    summarize_greedy, summarize_lead, summarize_lead_1, summarize_lead_words, summarize_random,
    summarize_textrank, Baseline, BaselineConfig, BaselineOutput, ExtractiveSummarizer,
    FallbackRule, DEFAULT_LENGTHS,
};
pub use budget::{budget_error, select_with_budget};
pub use llm::{
    length_stats, parse_summary, LengthStats, LlmSummarizer, SummarizationConfig, SummaryPrompt,
};
pub use textrank::{RelevanceScorer, TextRankScorer};
pub use unit::{join_units, units_from_sentences, Unit, Weighted};
