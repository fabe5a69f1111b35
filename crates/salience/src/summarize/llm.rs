//! Abstractive summaries from a generation service.

use serde_json::Value;
use tracing::{info, warn};

use crate::dataset::{Document, SummaryRecord};
use crate::error::Result;
use crate::genre::Genre;
use crate::llm::prompts::{meeting_summary_prompt, summary_prompt};
use crate::llm::{repair_json, user_conversation, Conversation, GenerationService, SamplingParams};
use crate::text::word_count;

use super::baselines::DEFAULT_LENGTHS;

/// Which summarization prompt to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryPrompt {
    /// Articles and paper sections.
    #[default]
    Generic,
    /// Meeting transcripts.
    Meeting,
}

impl SummaryPrompt {
    pub fn for_genre(genre: Genre) -> Self {
        if genre.is_meeting() {
            SummaryPrompt::Meeting
        } else {
            SummaryPrompt::Generic
        }
    }

    fn render(&self, text: &str, length: usize) -> String {
        match self {
            SummaryPrompt::Generic => summary_prompt(text, length),
            SummaryPrompt::Meeting => meeting_summary_prompt(text, length),
        }
    }
}

/// Settings for LLM summarization.
#[derive(Debug, Clone)]
pub struct SummarizationConfig {
    pub lengths: Vec<usize>,
    pub temperature: f64,
    pub max_tokens: usize,
    /// Independent samples per document and length.
    pub samples: usize,
    pub prompt: SummaryPrompt,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            lengths: DEFAULT_LENGTHS.to_vec(),
            temperature: 0.3,
            max_tokens: 1024,
            samples: 5,
            prompt: SummaryPrompt::Generic,
        }
    }
}

impl SummarizationConfig {
    pub fn with_lengths(mut self, lengths: Vec<usize>) -> Self {
        self.lengths = lengths;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(1);
        self
    }

    pub fn with_prompt(mut self, prompt: SummaryPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    /// Samples actually drawn: greedy decoding gives one.
    pub fn effective_samples(&self) -> usize {
        if self.temperature == 0.0 {
            1
        } else {
            self.samples.max(1)
        }
    }

    /// Output file name of sample `i` (`temperature0.3-2.json`).
    pub fn output_name(&self, sample: usize) -> String {
        format!("temperature{}-{}.json", format_temperature(self.temperature), sample)
    }
}

/// Summarizes documents at several lengths with a generation service.
pub struct LlmSummarizer<'a> {
    generator: &'a dyn GenerationService,
    config: SummarizationConfig,
}

impl<'a> LlmSummarizer<'a> {
    pub fn new(generator: &'a dyn GenerationService) -> Self {
        Self {
            generator,
            config: SummarizationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SummarizationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SummarizationConfig {
        &self.config
    }

    /// One table per sample, each with a summary column per length.
    ///
    /// Generation errors abort the run. Missing completions and unparsable
    /// responses leave `null` in the table.
    pub fn summarize(&self, documents: &[Document]) -> Result<Vec<Vec<SummaryRecord>>> {
        let samples = self.config.effective_samples();
        if samples < self.config.samples {
            warn!("temperature is 0; drawing 1 sample instead of {}", self.config.samples);
        }

        let mut tables: Vec<Vec<SummaryRecord>> = (0..samples)
            .map(|_| documents.iter().map(SummaryRecord::new).collect())
            .collect();
        let params = SamplingParams::new(self.config.temperature, self.config.max_tokens)
            .with_samples(samples);

        for &length in &self.config.lengths {
            info!("generate summaries for length: {}", length);
            let prompts: Vec<Conversation> = documents
                .iter()
                .map(|doc| user_conversation(self.config.prompt.render(&doc.text, length)))
                .collect();
            let responses = self.generator.generate(&prompts, &params)?;

            for (doc_index, completions) in responses.iter().enumerate() {
                for (sample, table) in tables.iter_mut().enumerate() {
                    let summary = completions
                        .get(sample)
                        .and_then(|raw| parse_summary(raw));
                    if let Some(record) = table.get_mut(doc_index) {
                        record.set_summary(length, summary);
                    }
                }
            }
        }

        Ok(tables)
    }
}

/// Extract the `summary` field of a response.
pub fn parse_summary(raw: &str) -> Option<String> {
    match repair_json(raw) {
        Ok(Value::Object(map)) => match map.get("summary") {
            Some(Value::String(s)) => Some(s.clone()),
            _ => {
                warn!(response = %raw, "response has no summary field");
                None
            }
        },
        Ok(_) | Err(_) => {
            warn!(response = %raw, "failed to parse summary response");
            None
        }
    }
}

/// Word-count statistics of one summary column.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthStats {
    pub length: usize,
    pub count: usize,
    pub mean: f64,
    pub min: usize,
    pub max: usize,
    /// Summaries that are missing or blank.
    pub empty: usize,
}

/// Statistics per length, for checking how well models follow the target.
pub fn length_stats(records: &[SummaryRecord], lengths: &[usize]) -> Vec<LengthStats> {
    lengths
        .iter()
        .map(|&length| {
            let counts: Vec<usize> = records
                .iter()
                .map(|r| r.summary(length).map(|s| word_count(s.trim())).unwrap_or(0))
                .collect();
            let total: usize = counts.iter().sum();
            LengthStats {
                length,
                count: counts.len(),
                mean: if counts.is_empty() {
                    0.0
                } else {
                    total as f64 / counts.len() as f64
                },
                min: counts.iter().copied().min().unwrap_or(0),
                max: counts.iter().copied().max().unwrap_or(0),
                empty: counts.iter().filter(|&&c| c == 0).count(),
            }
        })
        .collect()
}

fn format_temperature(t: f64) -> String {
    // Whole numbers keep a decimal point: 0 -> "0.0".
    if t.fract() == 0.0 {
        format!("{:.1}", t)
    } else {
        t.to_string()
    }
}
