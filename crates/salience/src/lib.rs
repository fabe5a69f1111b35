//! Salience: tools for studying what summaries choose to keep.
//!
//! The crate covers a research pipeline on information salience in text
//! summarization: extractive baselines under a word budget, abstractive
//! summaries from language models, atomic fact extraction, question
//! generation per summary length, question answering, and repeated LLM
//! ratings of question importance.
//!
//! # Core Principles
//!
//! - **Budgeted selection**: every extractive baseline orders sentences by
//!   its own priority and selects with the same greedy word-budget rule
//! - **Document order**: selected sentences are always emitted in their
//!   original order
//! - **Unreliable models**: model output is repaired, validated and retried,
//!   and partial results are kept rather than discarded
//!
//! # Example
//!
//! ```
//! use salience::summarize::{Baseline, ExtractiveSummarizer};
//!
//! let text = "The trial enrolled 54 patients. Half received a supplement. \
//!             Complications were less frequent in the supplement group.";
//! let summarizer = ExtractiveSummarizer::new();
//! let mut rng = fastrand::Rng::with_seed(0);
//!
//! let summary = summarizer.summarize(Baseline::Lead1, text, 10, &mut rng).unwrap();
//! assert_eq!(summary, "The trial enrolled 54 patients.");
//! ```

pub mod dataset;
pub mod error;
pub mod facts;
pub mod genre;
pub mod llm;
pub mod qa;
pub mod questions;
pub mod rating;
pub mod summarize;
pub mod text;

pub use dataset::{Document, Question, SummaryRecord};
pub use error::{Result, SalienceError};
pub use genre::{Genre, LengthConstraint};
pub use llm::{GenerationService, LlmConfig, MockGenerator, OllamaProvider, OpenAIProvider};
pub use rating::{Rater, RatingConfig, RatingOutcome, RatingPrompt, RatingTable};
pub use summarize::{Baseline, ExtractiveSummarizer, FallbackRule, LlmSummarizer};
