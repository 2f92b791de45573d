//! Benchmarks for per-result normalization and suggestion.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use newswatch::models::ResultSet;
use newswatch::normalize::{DateExtractor, DateFormatter, ResultNormalizer};
use newswatch::suggest::SpellSuggestionEngine;
use newswatch::testing::raw_page;

fn normalize_benchmark(c: &mut Criterion) {
    let extractor = DateExtractor::new();
    let formatter = DateFormatter::new();
    let normalizer = ResultNormalizer::new();

    c.bench_function("extract_date", |b| {
        b.iter(|| extractor.extract(black_box("Funding round closed 5 March 2024 for the startup")))
    });
    c.bench_function("format_iso_date", |b| {
        b.iter(|| formatter.format(black_box("2024-03-05T10:00:00+03:00")))
    });
    c.bench_function("annotate_page", |b| {
        b.iter(|| {
            raw_page(1, 10)
                .into_iter()
                .map(|raw| normalizer.annotate(raw))
                .count()
        })
    });
}

fn suggest_benchmark(c: &mut Criterion) {
    let normalizer = ResultNormalizer::new();
    let results = ResultSet::from_items(
        raw_page(1, 100)
            .into_iter()
            .map(|raw| normalizer.annotate(raw))
            .collect(),
    );
    let engine = SpellSuggestionEngine::new();

    c.bench_function("suggest_100_results", |b| {
        b.iter(|| engine.suggest(black_box("Reslt"), &results))
    });
}

criterion_group!(benches, normalize_benchmark, suggest_benchmark);
criterion_main!(benches);
