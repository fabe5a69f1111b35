//! Repeated rating passes with validation and bounded retries.
//!
//! Each pass shuffles the items, asks the model to rate them all in one
//! prompt and validates the answer. Rejected passes are retried until either
//! enough passes succeeded or the retry budget is spent; the table is returned
//! either way, with null columns for the passes that never succeeded.

use std::time::Duration;

use chrono::{DateTime, Utc};
use fastrand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::genre::{Genre, LengthConstraint};
use crate::llm::prompts::rating_prompt;
use crate::llm::{first_completions, user_conversation, GenerationService, SamplingParams};

use super::record::{validate_response, RatingRecord, RejectReason};
use super::table::{RatedItem, RatingTable};

/// Settings for a rating run.
#[derive(Debug, Clone)]
pub struct RatingConfig {
    /// Successful passes wanted.
    pub passes: usize,

    /// Failed passes tolerated before giving up.
    pub max_retries: usize,

    pub temperature: f64,

    pub max_tokens: usize,

    /// Per-request limit handed to the provider.
    pub timeout: Option<Duration>,

    /// Seed for the presentation shuffles; random if unset.
    pub seed: Option<u64>,

    /// Name of the key column in the output table.
    pub key_name: String,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            passes: 5,
            max_retries: 25,
            temperature: 0.3,
            max_tokens: 2048,
            timeout: None,
            seed: None,
            key_name: "cluster_id".to_string(),
        }
    }
}

impl RatingConfig {
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = key_name.into();
        self
    }

    fn sampling_params(&self) -> SamplingParams {
        let params = SamplingParams::new(self.temperature, self.max_tokens);
        match self.timeout {
            Some(timeout) => params.with_timeout(timeout),
            None => params,
        }
    }
}

/// The rating prompt template for one task and length.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingPrompt {
    pub task: String,
    pub length_constraint: String,
    pub with_rationale: bool,
}

impl RatingPrompt {
    pub fn new(task: impl Into<String>, length_constraint: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            length_constraint: length_constraint.into(),
            with_rationale: true,
        }
    }

    /// Prompt with the task of `genre` and the reminder for `length`.
    pub fn for_genre(genre: Genre, length: LengthConstraint) -> Self {
        Self::new(genre.task(), length.render())
    }

    /// Shorter prompt that asks for ratings only, for small context windows.
    pub fn without_rationale(mut self) -> Self {
        self.with_rationale = false;
        self
    }

    pub fn render(&self, questions: &[&str]) -> String {
        rating_prompt(
            &self.task,
            questions,
            &self.length_constraint,
            self.with_rationale,
        )
    }
}

/// Result of one pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    Accepted(Vec<RatingRecord>),
    Rejected(RejectReason),
}

/// Everything a rating run produced.
#[derive(Debug, Clone)]
pub struct RatingOutcome {
    pub table: RatingTable,
    pub completed: usize,
    pub retries: usize,
    pub rejections: Vec<RejectReason>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RatingOutcome {
    /// Run metadata for the `.meta.json` file.
    pub fn meta(&self, model: &str) -> RunMeta {
        RunMeta {
            model: model.to_string(),
            passes: self.table.passes(),
            completed: self.completed,
            retries: self.retries,
            rejections: self.rejections.iter().map(|r| r.to_string()).collect(),
            input_sha256: None,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Metadata written next to a rating table.
#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub model: String,
    pub passes: usize,
    pub completed: usize,
    pub retries: usize,
    pub rejections: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_sha256: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

enum State {
    Sampling,
    Validating { order: Vec<usize>, response: String },
    Aggregating { order: Vec<usize>, records: Vec<RatingRecord> },
}

/// Rates items with a generation service.
pub struct Rater<'a> {
    generator: &'a dyn GenerationService,
    prompt: RatingPrompt,
    config: RatingConfig,
}

impl<'a> Rater<'a> {
    pub fn new(generator: &'a dyn GenerationService, prompt: RatingPrompt) -> Self {
        Self {
            generator,
            prompt,
            config: RatingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RatingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Run passes until `passes` succeeded or `max_retries` failed.
    ///
    /// Exhausting the retries returns the partial table; an empty item list
    /// returns an empty one without calling the model.
    pub fn rate(&self, items: &[RatedItem]) -> Result<RatingOutcome> {
        let started_at = Utc::now();
        if items.is_empty() {
            warn!("no items to rate; returning an empty table");
            return Ok(RatingOutcome {
                table: RatingTable::new(self.config.key_name.clone(), items, self.config.passes),
                completed: 0,
                retries: 0,
                rejections: Vec::new(),
                started_at,
                finished_at: Utc::now(),
            });
        }

        let passes = self.config.passes;
        let max_retries = self.config.max_retries;
        let mut rng = match self.config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };

        let mut table = RatingTable::new(self.config.key_name.clone(), items, passes);
        let mut completed = 0;
        let mut retries = 0;
        let mut rejections = Vec::new();
        let mut state = State::Sampling;

        loop {
            state = match state {
                State::Sampling => {
                    if completed >= passes || retries >= max_retries {
                        break;
                    }
                    info!(
                        "rating {}/{} (retry: {}/{})",
                        completed + 1,
                        passes,
                        retries,
                        max_retries
                    );

                    let mut order: Vec<usize> = (0..items.len()).collect();
                    rng.shuffle(&mut order);
                    match self.sample(items, &order) {
                        Ok(response) => State::Validating { order, response },
                        Err(reason) => {
                            warn!(%reason, "rating pass failed");
                            retries += 1;
                            rejections.push(reason);
                            State::Sampling
                        }
                    }
                }
                State::Validating { order, response } => {
                    let presented: Vec<&str> =
                        order.iter().map(|&i| items[i].question.as_str()).collect();
                    match Self::validate(&response, &presented) {
                        PassOutcome::Accepted(records) => State::Aggregating { order, records },
                        PassOutcome::Rejected(reason) => {
                            warn!(%reason, response = %response, "rejected rating pass");
                            retries += 1;
                            rejections.push(reason);
                            State::Sampling
                        }
                    }
                }
                State::Aggregating { order, records } => {
                    table.record_pass(completed, &order, records);
                    completed += 1;
                    State::Sampling
                }
            };
        }

        if completed < passes {
            warn!(
                completed,
                passes, retries, "retry budget exhausted; missing passes are null"
            );
        }

        Ok(RatingOutcome {
            table,
            completed,
            retries,
            rejections,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Request one completion for the items in presentation order.
    fn sample(&self, items: &[RatedItem], order: &[usize]) -> std::result::Result<String, RejectReason> {
        let questions: Vec<&str> = order.iter().map(|&i| items[i].question.as_str()).collect();
        let prompt = self.prompt.render(&questions);
        debug!(prompt = %prompt, "rating prompt");

        let responses = self
            .generator
            .generate(&[user_conversation(prompt)], &self.config.sampling_params())
            .map_err(|e| RejectReason::Generation(e.to_string()))?;

        first_completions(responses)
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| RejectReason::Generation("no completion returned".to_string()))
    }

    fn validate(response: &str, presented: &[&str]) -> PassOutcome {
        match validate_response(response, presented) {
            Ok(records) => PassOutcome::Accepted(records),
            Err(reason) => PassOutcome::Rejected(reason),
        }
    }
}
