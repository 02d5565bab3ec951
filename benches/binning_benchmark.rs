//! Benchmark of histogram binning and descriptive statistics
//!
//! Run with: cargo bench --bench binning_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand::SeedableRng;

use pededash::pipeline::{density, describe, difference_summary, equal_width_histogram, DEFAULT_BINS};

fn generate_scores(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen::<f64>() * 10.0).collect()
}

fn benchmark_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("equal_width_histogram");

    for n in [1_000, 10_000, 100_000] {
        let values = generate_scores(n, 42);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| equal_width_histogram(black_box(values), DEFAULT_BINS))
        });
    }

    group.finish();
}

fn benchmark_differences(c: &mut Criterion) {
    let mut group = c.benchmark_group("difference_summary");

    for n in [1_000, 10_000] {
        let from: Vec<Option<f64>> = generate_scores(n, 1).into_iter().map(Some).collect();
        let to: Vec<Option<f64>> = generate_scores(n, 2).into_iter().map(Some).collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &(from, to), |b, (from, to)| {
            b.iter(|| difference_summary(black_box(from), black_box(to), DEFAULT_BINS))
        });
    }

    group.finish();
}

fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_statistics");
    let values = generate_scores(10_000, 3);

    group.bench_function("describe", |b| b.iter(|| describe(black_box(&values))));
    group.bench_function("density_64", |b| b.iter(|| density(black_box(&values), 64)));

    group.finish();
}

criterion_group!(benches, benchmark_histogram, benchmark_differences, benchmark_statistics);
criterion_main!(benches);
