//! Budget selection benchmarks.
//!
//! Measures the greedy selector and the final assembly of a summary across
//! candidate counts and budgets.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use salience::summarize::{join_units, select_with_budget, Unit};

/// Units of 5 to 29 words, in a fixed pseudo-random pattern.
fn generate_units(count: usize) -> Vec<Unit> {
    (0..count)
        .map(|i| {
            let words = 5 + (i * 7) % 25;
            Unit::new(i, vec!["token"; words].join(" "))
        })
        .collect()
}

/// Benchmark selection for growing candidate lists at a fixed budget.
fn bench_select_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_candidates");

    for count in [10, 100, 1_000].iter() {
        let units = generate_units(*count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("units", count), &units, |b, units| {
            b.iter(|| select_with_budget(black_box(units.iter()), black_box(200)))
        });
    }

    group.finish();
}

/// Benchmark selection for the default summary lengths.
fn bench_select_budgets(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_budgets");
    let units = generate_units(200);

    for budget in [10, 20, 50, 100, 200].iter() {
        group.bench_with_input(BenchmarkId::new("words", budget), budget, |b, &budget| {
            b.iter(|| select_with_budget(black_box(units.iter()), budget))
        });
    }

    group.finish();
}

/// Benchmark joining selected units back into a summary.
fn bench_join(c: &mut Criterion) {
    let units = generate_units(50);

    c.bench_function("join_units_50", |b| b.iter(|| join_units(black_box(&units))));
}

criterion_group!(
    benches,
    bench_select_candidates,
    bench_select_budgets,
    bench_join
);
criterion_main!(benches);
