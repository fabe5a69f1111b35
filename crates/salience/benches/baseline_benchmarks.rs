//! Extractive baseline benchmarks.
//!
//! Measures segmentation, TextRank scoring, and every baseline over
//! synthetic abstracts of growing length.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use salience::summarize::{Baseline, ExtractiveSummarizer, RelevanceScorer, TextRankScorer};
use salience::text::RuleSegmenter;

const VOCABULARY: [&str; 12] = [
    "patients", "trial", "protein", "healing", "surgery", "outcome", "cohort", "dose",
    "placebo", "risk", "analysis", "supplement",
];

/// Generate a synthetic document with the given number of sentences.
fn generate_document(sentences: usize) -> String {
    (0..sentences)
        .map(|i| {
            let words: Vec<&str> = (0..8 + i % 9)
                .map(|j| VOCABULARY[(i * 5 + j * 3) % VOCABULARY.len()])
                .collect();
            format!("Sentence {} covers {}.", i, words.join(" "))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Benchmark sentence segmentation.
fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    let segmenter = RuleSegmenter::new();

    for sentences in [10, 100, 1_000].iter() {
        let text = generate_document(*sentences);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("sentences", sentences), &text, |b, text| {
            b.iter(|| segmenter.split(black_box(text)))
        });
    }

    group.finish();
}

/// Benchmark TextRank scoring, which is quadratic in the sentence count.
fn bench_textrank_scores(c: &mut Criterion) {
    let mut group = c.benchmark_group("textrank_scores");
    let scorer = TextRankScorer::new();
    let segmenter = RuleSegmenter::new();

    for sentences in [10, 50, 200].iter() {
        let split = segmenter.split(&generate_document(*sentences));

        group.bench_with_input(BenchmarkId::new("sentences", sentences), &split, |b, split| {
            b.iter(|| scorer.score(black_box(split)).unwrap())
        });
    }

    group.finish();
}

/// Benchmark each baseline on a typical abstract at a 50 word budget.
fn bench_baselines(c: &mut Criterion) {
    let mut group = c.benchmark_group("baselines");
    let summarizer = ExtractiveSummarizer::new();
    let text = generate_document(12);

    for baseline in Baseline::ALL {
        group.bench_function(baseline.dir_name(), |b| {
            b.iter_with_setup(
                || fastrand::Rng::with_seed(0),
                |mut rng| {
                    summarizer
                        .summarize(baseline, black_box(&text), 50, &mut rng)
                        .unwrap()
                },
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_segment, bench_textrank_scores, bench_baselines);
criterion_main!(benches);
