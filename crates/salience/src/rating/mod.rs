//! Question importance rating.
//!
//! A [`Rater`] presents every question to a generation service in a
//! shuffled order, validates the returned list (count, ids, echoed
//! questions, ratings on the 1-5 scale) and collects one column per
//! successful pass in a [`RatingTable`] keyed by the stable item key.
//!
//! # Example
//!
//! ```no_run
//! use salience::genre::{Genre, LengthConstraint};
//! use salience::llm::{LlmConfig, OpenAIProvider};
//! use salience::rating::{RatedItem, Rater, RatingPrompt};
//!
//! let provider = OpenAIProvider::from_env(LlmConfig::default()).unwrap();
//! let prompt = RatingPrompt::for_genre(Genre::Pubmed, LengthConstraint::Words(50));
//! let items = vec![
//!     RatedItem::new("0", "What was the sample size?"),
//!     RatedItem::new("1", "Who funded the trial?"),
//! ];
//!
//! let outcome = Rater::new(&provider, prompt).rate(&items).unwrap();
//! println!("{} passes, {} retries", outcome.completed, outcome.retries);
//! ```

mod protocol;
mod record;
mod table;

pub use protocol::{PassOutcome, Rater, RatingConfig, RatingOutcome, RatingPrompt, RunMeta};
pub use record::{validate_response, Rating, RatingRecord, RejectReason};
pub use table::{RatedItem, RatingRow, RatingTable};
