//! Benchmark of the indicator correlation matrix
//!
//! Run with: cargo bench --bench correlation_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand::SeedableRng;

use pededash::pipeline::{correlation_matrix, pearson_correlation};

/// Synthetic indicator columns with a share of missing cells
fn generate_columns(n_rows: usize, n_columns: usize, seed: u64) -> Vec<(String, Vec<Option<f64>>)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut columns: Vec<(String, Vec<Option<f64>>)> = Vec::with_capacity(n_columns);

    for i in 0..n_columns {
        let values: Vec<Option<f64>> = if i % 3 == 2 {
            // Noisy copy of an earlier indicator, so some pairs correlate
            columns[i - 2]
                .1
                .iter()
                .map(|v| v.map(|x| x + rng.gen::<f64>() - 0.5))
                .collect()
        } else {
            (0..n_rows)
                .map(|_| {
                    if rng.gen::<f64>() < 0.05 {
                        None
                    } else {
                        Some(rng.gen::<f64>() * 10.0)
                    }
                })
                .collect()
        };
        columns.push((format!("IND_{}", i), values));
    }

    columns
}

/// The dashboard correlates 18 columns; also check how the matrix scales
fn benchmark_matrix_by_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix_by_columns");
    group.sample_size(30);

    let n_rows = 1_000;
    for n_columns in [6, 18, 50, 100] {
        let columns = generate_columns(n_rows, n_columns, 42);
        let pairs = (n_columns * (n_columns - 1) / 2) as u64;
        group.throughput(Throughput::Elements(pairs));
        group.bench_with_input(BenchmarkId::from_parameter(n_columns), &columns, |b, columns| {
            b.iter(|| correlation_matrix(black_box(columns)))
        });
    }

    group.finish();
}

fn benchmark_pearson_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("pearson_by_rows");

    for n_rows in [1_000, 10_000, 100_000] {
        let columns = generate_columns(n_rows, 3, 7);
        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &columns, |b, columns| {
            b.iter(|| pearson_correlation(black_box(&columns[0].1), black_box(&columns[2].1)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_matrix_by_columns, benchmark_pearson_by_rows);
criterion_main!(benches);
