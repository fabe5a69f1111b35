//! Integration tests for Salience.

use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

use salience::dataset::{self, Document, Question, SummaryRecord};
use salience::genre::{Genre, LengthConstraint};
use salience::llm::{Conversation, MockGenerator};
use salience::rating::{RatedItem, Rater, RatingConfig, RatingPrompt, RejectReason};
use salience::summarize::{
    select_with_budget, Baseline, BaselineConfig, ExtractiveSummarizer, FallbackRule, Unit,
};

const ABSTRACT: &str = "Protein-rich nutrition supports wound healing. \
    Fifty-eight patients were randomized. \
    The nutrition group received supplements for ten days before surgery. \
    Complications were less frequent with supplements. \
    Costs were equal.";

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// Rate every presented question 1-5 by its position in the original list.
fn echo_ratings(questions: &'static [&'static str]) -> impl Fn(&Conversation) -> String {
    move |prompt: &Conversation| {
        let content = &prompt[0].content;
        let entries: Vec<String> = content
            .lines()
            .filter_map(|line| {
                let (id, question) = line.split_once(". ")?;
                let id: usize = id.parse().ok()?;
                let original = questions.iter().position(|q| *q == question)?;
                Some(format!(
                    r#"{{"id": "{}", "question": "{}", "rationale": "ok", "rating": "{}"}}"#,
                    id,
                    question,
                    original % 5 + 1
                ))
            })
            .collect();
        format!("```json\n[{}]\n```", entries.join(",\n"))
    }
}

// =============================================================================
// Budget Selector Scenarios
// =============================================================================

#[test]
fn test_one_word_units_budget_two() {
    let units: Vec<Unit> = ["alpha", "beta", "gamma", "delta", "epsilon"]
        .iter()
        .enumerate()
        .map(|(i, w)| Unit::new(i, *w))
        .collect();

    let selected = select_with_budget(units, 2);
    let indices: Vec<usize> = selected.iter().map(Unit::index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn test_zero_budget_falls_back_to_first_sentence() {
    let summarizer = ExtractiveSummarizer::new();
    let mut rng = fastrand::Rng::with_seed(0);
    for baseline in Baseline::ALL {
        let summary = summarizer.summarize(baseline, ABSTRACT, 0, &mut rng).unwrap();
        assert_eq!(summary, "Protein-rich nutrition supports wound healing.");
    }
}

#[test]
fn test_first_in_priority_fallback_uses_policy_order() {
    let summarizer = ExtractiveSummarizer::new().with_fallback(FallbackRule::FirstInPriority);
    assert_eq!(summarizer.greedy(ABSTRACT, 0).unwrap(), "Costs were equal.");
}

// =============================================================================
// Baseline Pipeline
// =============================================================================

#[test]
fn test_baselines_from_documents_file() {
    let file = create_test_file(&format!(
        r#"[{{"doc_id": 1, "text": "{}"}}, {{"doc_id": "b", "text": "Only one sentence here."}}]"#,
        ABSTRACT
    ));
    let documents = dataset::load_documents(file.path()).unwrap();
    assert_eq!(documents[0].doc_id, "1");

    let dir = TempDir::new().unwrap();
    let config = BaselineConfig::default().with_random_seeds(2);
    let summarizer = ExtractiveSummarizer::new();

    let mut written = Vec::new();
    for baseline in Baseline::ALL {
        for output in summarizer.run(baseline, &documents, &config).unwrap() {
            let path = dir.path().join(output.relative_path());
            dataset::write_records(&path, &output.records).unwrap();
            written.push(path);
        }
    }
    assert_eq!(written.len(), 6);
    assert!(dir.path().join("random/summaries/output-1.json").exists());
    assert!(dir.path().join("lead_n/summaries/output.json").exists());

    let lead: Vec<SummaryRecord> =
        dataset::load_records(dir.path().join("lead_n/summaries/output.json")).unwrap();
    assert_eq!(lead.len(), 2);
    assert_eq!(lead[0].lengths(), vec![10, 20, 50, 100, 200]);
    assert_eq!(
        lead[0].summary(10),
        Some("Protein-rich nutrition supports wound healing. Fifty-eight patients were randomized.")
    );
    assert_eq!(lead[1].summary(200), Some("Only one sentence here."));

    let lead_1: Vec<SummaryRecord> =
        dataset::load_records(dir.path().join("lead_1/summaries/output.json")).unwrap();
    assert_eq!(lead_1[0].summary(10), lead_1[0].summary(200));
}

#[test]
fn test_longer_budgets_never_shorten_lead_summaries() {
    let documents = vec![Document::new("d", ABSTRACT)];
    let records = ExtractiveSummarizer::new()
        .summarize_documents(
            Baseline::LeadWords,
            &documents,
            &[10, 20, 50],
            &mut fastrand::Rng::with_seed(0),
        )
        .unwrap();

    let lengths: Vec<usize> = [10, 20, 50]
        .iter()
        .map(|&l| records[0].summary(l).unwrap().len())
        .collect();
    assert!(lengths.windows(2).all(|w| w[0] <= w[1]));
}

// =============================================================================
// Rating Pipeline
// =============================================================================

static QUESTIONS: [&str; 4] = [
    "What intervention was tested?",
    "How many patients were randomized?",
    "What was the primary outcome?",
    "Did costs differ between groups?",
];

fn question_items() -> Vec<RatedItem> {
    QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| RatedItem::from(&Question::new(format!("c{}", i), *q)))
        .collect()
}

#[test]
fn test_rating_run_writes_table_and_meta() {
    let mock = MockGenerator::with_handler(echo_ratings(&QUESTIONS));
    mock.push_response("Sorry, I cannot help with that.");

    let prompt = RatingPrompt::for_genre(Genre::Pubmed, LengthConstraint::Words(20));
    let rater = Rater::new(&mock, prompt).with_config(RatingConfig::default().with_seed(11));
    let outcome = rater.rate(&question_items()).unwrap();

    assert_eq!(outcome.completed, 5);
    assert_eq!(outcome.retries, 1);
    assert!(matches!(outcome.rejections[0], RejectReason::Parse(_)));

    // Every pass rated every item by its identity, whatever the shuffle was.
    for (i, row) in outcome.table.rows().iter().enumerate() {
        assert_eq!(row.key, format!("c{}", i));
        for rating in &row.ratings {
            assert_eq!(rating.map(|r| r.value()), Some((i % 5 + 1) as u8));
        }
    }

    // Shuffles differ between passes.
    let prompts: Vec<String> = mock.received().iter().map(|p| p[0].content.clone()).collect();
    assert!(prompts.iter().any(|p| p != &prompts[0]));
    assert!(prompts[0].contains("limited to exactly 20 words"));

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("ratings/20w.json");
    outcome.table.write_json(&out).unwrap();
    outcome.table.write_csv(dir.path().join("ratings/20w.csv")).unwrap();
    dataset::write_json(dir.path().join("ratings/20w.meta.json"), &outcome.meta(mock_model()))
        .unwrap();

    let rows: Vec<serde_json::Value> = dataset::load_records(&out).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1]["cluster_id"], "c1");
    assert_eq!(rows[1]["rating4"], 2);
    assert_eq!(rows[1]["rationale0"], "ok");

    let meta: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("ratings/20w.meta.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(meta["retries"], 1);
    assert_eq!(meta["completed"], 5);
}

#[test]
fn test_rating_run_keeps_partial_results() {
    let mock = MockGenerator::new();
    for _ in 0..3 {
        mock.push_response(r#"[{"id": 1, "question": "What intervention was tested?", "rating": 3}]"#);
    }

    let prompt = RatingPrompt::for_genre(Genre::Pubmed, LengthConstraint::Generic);
    let rater = Rater::new(&mock, prompt)
        .with_config(RatingConfig::default().with_max_retries(3).with_passes(5));
    let outcome = rater.rate(&question_items()).unwrap();

    assert_eq!(outcome.completed, 0);
    assert_eq!(outcome.retries, 3);
    assert_eq!(outcome.table.empty_passes(), 5);
    assert!(outcome
        .rejections
        .iter()
        .all(|r| matches!(r, RejectReason::CountMismatch { expected: 4, actual: 1 })));
}

fn mock_model() -> &'static str {
    "mock-model"
}
