//! Question generation from multi-length summaries.
//!
//! The model sees a batch of documents, each summarized at several lengths,
//! and proposes questions that summaries of each length typically answer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::dataset::SummaryRecord;
use crate::error::{Result, SalienceError};
use crate::genre::Genre;
use crate::llm::prompts::question_generation_prompt;
use crate::llm::{first_completions, repair_json, user_conversation, GenerationService, SamplingParams};

/// A question proposed for one summary length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    /// Index of the prompt batch that produced the question.
    pub batch: usize,
    /// Summary length in words the question belongs to.
    pub length: usize,
    pub question: String,
    #[serde(default)]
    pub example_answer: Option<String>,
}

/// Settings for question generation.
#[derive(Debug, Clone)]
pub struct QuestionConfig {
    /// Documents per prompt.
    pub batch_size: usize,
    pub temperature: f64,
    pub max_tokens: usize,
}

impl Default for QuestionConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            temperature: 1.0,
            max_tokens: 4096,
        }
    }
}

impl QuestionConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Generates questions for a genre from summary records.
pub struct QuestionGenerator<'a> {
    generator: &'a dyn GenerationService,
    genre: Genre,
    config: QuestionConfig,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(generator: &'a dyn GenerationService, genre: Genre) -> Self {
        Self {
            generator,
            genre,
            config: QuestionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: QuestionConfig) -> Self {
        self.config = config;
        self
    }

    /// Prompts for `records`, `batch_size` documents each.
    ///
    /// Only lengths present in a record are listed; missing summaries are
    /// shown as empty.
    pub fn prompts(&self, records: &[SummaryRecord]) -> Vec<String> {
        records
            .chunks(self.config.batch_size.max(1))
            .map(|batch| {
                let documents: Vec<Vec<(usize, String)>> = batch
                    .iter()
                    .map(|record| {
                        record
                            .lengths()
                            .into_iter()
                            .map(|l| (l, record.summary(l).unwrap_or_default().to_string()))
                            .collect()
                    })
                    .collect();
                question_generation_prompt(&documents, self.genre.topic())
            })
            .collect()
    }

    /// Questions from every batch, in batch and length order.
    pub fn generate(&self, records: &[SummaryRecord]) -> Result<Vec<GeneratedQuestion>> {
        if records.is_empty() {
            return Err(SalienceError::EmptyData("no summaries given".to_string()));
        }

        let prompts: Vec<_> = self
            .prompts(records)
            .into_iter()
            .map(user_conversation)
            .collect();
        info!("generating questions with {} prompts", prompts.len());

        let params = SamplingParams::new(self.config.temperature, self.config.max_tokens);
        let responses = first_completions(self.generator.generate(&prompts, &params)?);

        Ok(responses
            .into_iter()
            .enumerate()
            .flat_map(|(batch, response)| {
                response
                    .map(|r| parse_questions(&r, batch))
                    .unwrap_or_default()
            })
            .collect())
    }
}

/// Parse a `{"questions_<L>_words": [{question, example_answer}]}` response.
///
/// Unknown keys and entries without a question are skipped; an unparsable
/// response gives no questions.
pub fn parse_questions(response: &str, batch: usize) -> Vec<GeneratedQuestion> {
    let map = match repair_json(response) {
        Ok(Value::Object(map)) => map,
        _ => {
            warn!(response = %response, "failed to parse generated questions");
            return Vec::new();
        }
    };

    let mut questions = Vec::new();
    for (key, value) in map {
        let Some(length) = key
            .strip_prefix("questions_")
            .and_then(|rest| rest.strip_suffix("_words"))
            .and_then(|l| l.parse::<usize>().ok())
        else {
            continue;
        };

        for entry in value.as_array().into_iter().flatten() {
            let Some(question) = entry.get("question").and_then(Value::as_str) else {
                continue;
            };
            if question.trim().is_empty() {
                continue;
            }
            questions.push(GeneratedQuestion {
                batch,
                length,
                question: question.trim().to_string(),
                example_answer: entry
                    .get("example_answer")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }
    }
    questions.sort_by_key(|q| q.length);
    questions
}
