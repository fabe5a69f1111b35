//! Extractive summarization baselines under a word budget.
//!
//! Every policy segments the text into indexed sentences, orders them by
//! its own priority, selects with [`select_with_budget`], falls back to a
//! single sentence when nothing was selected, and finally restores document
//! order before joining. Only the priority order differs between policies.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{Document, SummaryRecord};
use crate::error::{Result, SalienceError};
use crate::text::{RuleSegmenter, SentenceSegmenter};

use super::budget::select_with_budget;
use super::textrank::{RelevanceScorer, TextRankScorer};
use super::unit::{join_units, units_from_sentences, Unit};

/// Default summary lengths in words.
pub const DEFAULT_LENGTHS: [usize; 5] = [10, 20, 50, 100, 200];

/// Which unit to keep when the budget selection comes back empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackRule {
    /// The first sentence of the document.
    #[default]
    FirstInDocument,
    /// The first sentence of the policy's priority order (e.g. the most
    /// relevant sentence for TextRank, the shortest for greedy).
    FirstInPriority,
}

/// The extractive baseline policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Baseline {
    /// First sentence only; the budget is ignored.
    Lead1,
    /// Leading sentences up to the word budget.
    LeadWords,
    /// Shuffled sentences up to the word budget.
    Random,
    /// Shortest sentences first.
    Greedy,
    /// Most relevant sentences first.
    TextRank,
}

impl Baseline {
    /// All baselines in the order they are usually run.
    pub const ALL: [Baseline; 5] = [
        Baseline::Lead1,
        Baseline::LeadWords,
        Baseline::Random,
        Baseline::Greedy,
        Baseline::TextRank,
    ];

    /// Output directory name for the baseline.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Baseline::Lead1 => "lead_1",
            Baseline::LeadWords => "lead_n",
            Baseline::Random => "random",
            Baseline::Greedy => "greedy",
            Baseline::TextRank => "textrank",
        }
    }

    /// Whether the output depends on a random seed.
    pub fn is_seeded(&self) -> bool {
        matches!(self, Baseline::Random)
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Baseline {
    type Err = SalienceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "lead_1" | "lead1" => Ok(Baseline::Lead1),
            "lead_n" | "lead_words" => Ok(Baseline::LeadWords),
            "random" => Ok(Baseline::Random),
            "greedy" => Ok(Baseline::Greedy),
            "textrank" => Ok(Baseline::TextRank),
            other => Err(SalienceError::Config(format!("Unknown baseline: {}", other))),
        }
    }
}

/// Settings for a batch run of the baselines.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineConfig {
    pub lengths: Vec<usize>,
    /// Seeds `0..random_seeds` are run for the random baseline.
    pub random_seeds: u64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            lengths: DEFAULT_LENGTHS.to_vec(),
            random_seeds: 5,
        }
    }
}

impl BaselineConfig {
    pub fn with_lengths(mut self, lengths: Vec<usize>) -> Self {
        self.lengths = lengths;
        self
    }

    pub fn with_random_seeds(mut self, seeds: u64) -> Self {
        self.random_seeds = seeds;
        self
    }
}

/// One output table of a batch run and where it belongs.
#[derive(Debug, Clone)]
pub struct BaselineOutput {
    pub baseline: Baseline,
    /// Seed of the random baseline.
    pub seed: Option<u64>,
    pub records: Vec<SummaryRecord>,
}

impl BaselineOutput {
    /// Path relative to the output root, e.g. `random/summaries/output-2.json`.
    pub fn relative_path(&self) -> PathBuf {
        let file = match self.seed {
            Some(seed) => format!("output-{}.json", seed),
            None => "output.json".to_string(),
        };
        Path::new(self.baseline.dir_name()).join("summaries").join(file)
    }
}

/// Extractive summarizer with pluggable segmentation and relevance scoring.
pub struct ExtractiveSummarizer {
    segmenter: Box<dyn SentenceSegmenter>,
    scorer: Box<dyn RelevanceScorer>,
    fallback: FallbackRule,
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractiveSummarizer {
    /// Rule-based segmentation, TextRank relevance, document-order fallback.
    pub fn new() -> Self {
        Self {
            segmenter: Box::new(RuleSegmenter::new()),
            scorer: Box::new(TextRankScorer::new()),
            fallback: FallbackRule::default(),
        }
    }

    pub fn with_segmenter(mut self, segmenter: impl SentenceSegmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    pub fn with_scorer(mut self, scorer: impl RelevanceScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackRule) -> Self {
        self.fallback = fallback;
        self
    }

    /// Segment `text` into units indexed by sentence position.
    pub fn units(&self, text: &str) -> Result<Vec<Unit>> {
        Ok(units_from_sentences(self.segmenter.segment(text)?))
    }

    /// The first `n` sentences; `n` counts sentences, not words.
    pub fn lead(&self, text: &str, n: usize) -> Result<String> {
        let mut units = self.units(text)?;
        units.truncate(n);
        Ok(join_units(&units))
    }

    /// The first sentence, whatever the budget.
    pub fn lead_1(&self, text: &str, _budget: usize) -> Result<String> {
        self.lead(text, 1)
    }

    /// Leading sentences up to `budget` words.
    pub fn lead_words(&self, text: &str, budget: usize) -> Result<String> {
        let units = self.units(text)?;
        Ok(self.finish(units, budget))
    }

    /// Sentences in an order shuffled by `rng`, up to `budget` words.
    pub fn random(&self, text: &str, budget: usize, rng: &mut Rng) -> Result<String> {
        let mut units = self.units(text)?;
        rng.shuffle(&mut units);
        Ok(self.finish(units, budget))
    }

    /// Shortest sentences first, up to `budget` words. Equal lengths keep
    /// document order.
    pub fn greedy(&self, text: &str, budget: usize) -> Result<String> {
        let mut units = self.units(text)?;
        units.sort_by_key(Unit::word_count);
        Ok(self.finish(units, budget))
    }

    /// Most relevant sentences first, up to `budget` words. Equal scores keep
    /// document order.
    pub fn textrank(&self, text: &str, budget: usize) -> Result<String> {
        let sentences = self.segmenter.segment(text)?;
        let scores = self.scorer.score(&sentences)?;
        if scores.len() != sentences.len() {
            return Err(SalienceError::Config(format!(
                "Relevance scorer returned {} scores for {} sentences",
                scores.len(),
                sentences.len()
            )));
        }

        let mut units: Vec<Unit> = units_from_sentences(sentences)
            .into_iter()
            .zip(scores)
            .map(|(unit, score)| unit.with_score(score))
            .collect();
        units.sort_by(|a, b| {
            let a = a.score().unwrap_or(f64::NEG_INFINITY);
            let b = b.score().unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        });
        Ok(self.finish(units, budget))
    }

    /// Run one baseline. `rng` is only consumed by [`Baseline::Random`].
    pub fn summarize(
        &self,
        baseline: Baseline,
        text: &str,
        budget: usize,
        rng: &mut Rng,
    ) -> Result<String> {
        match baseline {
            Baseline::Lead1 => self.lead_1(text, budget),
            Baseline::LeadWords => self.lead_words(text, budget),
            Baseline::Random => self.random(text, budget, rng),
            Baseline::Greedy => self.greedy(text, budget),
            Baseline::TextRank => self.textrank(text, budget),
        }
    }

    /// Summarize every document at every length.
    ///
    /// Lengths are processed one at a time over all documents, and the same
    /// `rng` is carried through, so a seed fixes the whole table.
    pub fn summarize_documents(
        &self,
        baseline: Baseline,
        documents: &[Document],
        lengths: &[usize],
        rng: &mut Rng,
    ) -> Result<Vec<SummaryRecord>> {
        let mut records: Vec<SummaryRecord> = documents.iter().map(SummaryRecord::new).collect();

        for &length in lengths {
            debug!(baseline = %baseline, length, "summarizing {} documents", documents.len());
            for (doc, record) in documents.iter().zip(records.iter_mut()) {
                let summary = self.summarize(baseline, &doc.text, length, rng)?;
                record.set_summary(length, Some(summary));
            }
        }

        Ok(records)
    }

    /// Run `baseline` over `documents`: one table, or one per seed for the
    /// random baseline.
    pub fn run(
        &self,
        baseline: Baseline,
        documents: &[Document],
        config: &BaselineConfig,
    ) -> Result<Vec<BaselineOutput>> {
        if baseline.is_seeded() {
            (0..config.random_seeds)
                .map(|seed| {
                    let mut rng = Rng::with_seed(seed);
                    let records =
                        self.summarize_documents(baseline, documents, &config.lengths, &mut rng)?;
                    Ok(BaselineOutput {
                        baseline,
                        seed: Some(seed),
                        records,
                    })
                })
                .collect()
        } else {
            let mut rng = Rng::with_seed(0);
            let records =
                self.summarize_documents(baseline, documents, &config.lengths, &mut rng)?;
            Ok(vec![BaselineOutput {
                baseline,
                seed: None,
                records,
            }])
        }
    }

    /// Select, apply the fallback and restore document order.
    fn finish(&self, ordered: Vec<Unit>, budget: usize) -> String {
        let fallback = match self.fallback {
            FallbackRule::FirstInPriority => ordered.first().cloned(),
            FallbackRule::FirstInDocument => ordered.iter().min_by_key(|u| u.index()).cloned(),
        };

        let mut selected = select_with_budget(ordered, budget);
        if selected.is_empty() {
            selected.extend(fallback);
        }

        selected.sort_by_key(Unit::index);
        join_units(&selected)
    }
}

/// The first `n` sentences of `text`.
pub fn summarize_lead(text: &str, n: usize) -> Result<String> {
    ExtractiveSummarizer::new().lead(text, n)
}

/// The first sentence of `text`; `budget` is ignored.
pub fn summarize_lead_1(text: &str, budget: usize) -> Result<String> {
    ExtractiveSummarizer::new().lead_1(text, budget)
}

/// Leading sentences of `text` up to `budget` words.
pub fn summarize_lead_words(text: &str, budget: usize) -> Result<String> {
    ExtractiveSummarizer::new().lead_words(text, budget)
}

/// Randomly ordered sentences of `text` up to `budget` words.
pub fn summarize_random(text: &str, budget: usize, rng: &mut Rng) -> Result<String> {
    ExtractiveSummarizer::new().random(text, budget, rng)
}

/// Shortest sentences of `text` up to `budget` words.
pub fn summarize_greedy(text: &str, budget: usize) -> Result<String> {
    ExtractiveSummarizer::new().greedy(text, budget)
}

/// Most relevant sentences of `text` up to `budget` words.
pub fn summarize_textrank(text: &str, budget: usize) -> Result<String> {
    ExtractiveSummarizer::new().textrank(text, budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Alpha beta gamma delta. Short one. \
                        Epsilon zeta eta theta iota kappa. Tiny.";

    /// Scores sentences by a fixed list, for deterministic ordering tests.
    struct FixedScorer(Vec<f64>);

    impl RelevanceScorer for FixedScorer {
        fn score(&self, _sentences: &[String]) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_lead_takes_sentence_count() {
        assert_eq!(
            summarize_lead(TEXT, 2).unwrap(),
            "Alpha beta gamma delta. Short one."
        );
        assert_eq!(summarize_lead(TEXT, 0).unwrap(), "");
    }

    #[test]
    fn test_lead_1_ignores_budget() {
        for budget in [0, 1, 10, 1000] {
            assert_eq!(
                summarize_lead_1(TEXT, budget).unwrap(),
                "Alpha beta gamma delta."
            );
        }
        assert_eq!(summarize_lead_1("", 10).unwrap(), "");
    }

    #[test]
    fn test_lead_words_respects_budget() {
        // 5 + 3 words
        assert_eq!(
            summarize_lead_words(TEXT, 8).unwrap(),
            "Alpha beta gamma delta. Short one."
        );
    }

    #[test]
    fn test_zero_budget_falls_back_to_first_sentence() {
        assert_eq!(
            summarize_lead_words(TEXT, 0).unwrap(),
            "Alpha beta gamma delta."
        );
        assert_eq!(summarize_greedy(TEXT, 0).unwrap(), "Alpha beta gamma delta.");
    }

    #[test]
    fn test_fallback_in_priority_order() {
        let summarizer =
            ExtractiveSummarizer::new().with_fallback(FallbackRule::FirstInPriority);
        // Shortest sentence is "Tiny." (2 tokens).
        assert_eq!(summarizer.greedy(TEXT, 0).unwrap(), "Tiny.");
    }

    #[test]
    fn test_greedy_restores_document_order() {
        // Shortest first: "Tiny." (2), "Short one." (3) -> total 5.
        assert_eq!(summarize_greedy(TEXT, 5).unwrap(), "Short one. Tiny.");
    }

    #[test]
    fn test_textrank_orders_by_score_then_document() {
        let summarizer =
            ExtractiveSummarizer::new().with_scorer(FixedScorer(vec![0.1, 0.2, 0.2, 0.9]));
        // Priority: Tiny. (2), Short one. (3), Epsilon... (7), Alpha... (5)
        assert_eq!(summarizer.textrank(TEXT, 5).unwrap(), "Short one. Tiny.");
    }

    #[test]
    fn test_textrank_fallback_follows_fallback_rule() {
        // "Short one." ranks first; nothing fits a zero budget.
        let scores = vec![0.1, 0.9, 0.2, 0.3];
        let by_priority = ExtractiveSummarizer::new()
            .with_scorer(FixedScorer(scores.clone()))
            .with_fallback(FallbackRule::FirstInPriority);
        assert_eq!(by_priority.textrank(TEXT, 0).unwrap(), "Short one.");

        let by_document = ExtractiveSummarizer::new()
            .with_scorer(FixedScorer(scores))
            .with_fallback(FallbackRule::FirstInDocument);
        assert_eq!(
            by_document.textrank(TEXT, 0).unwrap(),
            "Alpha beta gamma delta."
        );
    }

    #[test]
    fn test_textrank_rejects_misaligned_scores() {
        let summarizer = ExtractiveSummarizer::new().with_scorer(FixedScorer(vec![1.0]));
        assert!(summarizer.textrank(TEXT, 5).is_err());
    }

    #[test]
    fn test_random_is_deterministic_for_seed() {
        let a = summarize_random(TEXT, 8, &mut Rng::with_seed(7)).unwrap();
        let b = summarize_random(TEXT, 8, &mut Rng::with_seed(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_text_gives_empty_summary() {
        let mut rng = Rng::with_seed(1);
        let summarizer = ExtractiveSummarizer::new();
        for baseline in Baseline::ALL {
            assert_eq!(summarizer.summarize(baseline, "", 10, &mut rng).unwrap(), "");
        }
    }

    #[test]
    fn test_baseline_names_round_trip() {
        for baseline in Baseline::ALL {
            assert_eq!(baseline.dir_name().parse::<Baseline>().unwrap(), baseline);
        }
        assert!("summa".parse::<Baseline>().is_err());
    }

    #[test]
    fn test_summarize_documents_fills_every_length() {
        let docs = vec![
            Document::new("1", TEXT),
            Document::new("2", "One sentence only."),
        ];
        let records = ExtractiveSummarizer::new()
            .summarize_documents(Baseline::LeadWords, &docs, &[5, 8], &mut Rng::with_seed(0))
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].summary(8), Some("Alpha beta gamma delta. Short one."));
        assert_eq!(records[1].summary(5), Some("One sentence only."));
    }

    #[test]
    fn test_run_writes_one_table_per_seed() {
        let docs = vec![Document::new("1", TEXT)];
        let config = BaselineConfig::default()
            .with_lengths(vec![5])
            .with_random_seeds(3);
        let summarizer = ExtractiveSummarizer::new();

        let random = summarizer.run(Baseline::Random, &docs, &config).unwrap();
        assert_eq!(random.len(), 3);
        assert_eq!(
            random[2].relative_path(),
            Path::new("random/summaries/output-2.json")
        );

        let greedy = summarizer.run(Baseline::Greedy, &docs, &config).unwrap();
        assert_eq!(greedy.len(), 1);
        assert_eq!(
            greedy[0].relative_path(),
            Path::new("greedy/summaries/output.json")
        );
        assert_eq!(greedy[0].records[0].summary(5), Some("Short one. Tiny."));
    }
}
