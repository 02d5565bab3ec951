//! Pairwise-complete Pearson correlation between indicator columns

use rayon::prelude::*;
use serde::Serialize;

/// Represents a correlated pair of columns
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Symmetric correlation matrix. `None` marks a coefficient that could not be
/// computed (fewer than two complete pairs, or a constant column).
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied().flatten()
    }

    /// Off-diagonal pairs with |r| above `threshold`, strongest first
    pub fn pairs_above(&self, threshold: f64) -> Vec<CorrelatedPair> {
        let n = self.len();
        let mut pairs = Vec::new();

        // Extract upper triangle
        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(corr) = self.get(i, j) {
                    if corr.abs() > threshold {
                        pairs.push(CorrelatedPair {
                            feature1: self.columns[i].clone(),
                            feature2: self.columns[j].clone(),
                            correlation: corr,
                        });
                    }
                }
            }
        }

        // Sort by absolute correlation descending
        pairs.sort_by(|a, b| {
            b.correlation
                .abs()
                .partial_cmp(&a.correlation.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        pairs
    }
}

/// Build the correlation matrix of `columns` (name, row-aligned values).
///
/// Each coefficient uses only the rows where both columns are present. The
/// diagonal is 1.0 for every column with at least two present values.
/// Off-diagonal pairs are computed in parallel.
pub fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
    let n = columns.len();
    let mut values = vec![vec![None; n]; n];

    for (i, (_, col)) in columns.iter().enumerate() {
        if col.iter().flatten().count() >= 2 {
            values[i][i] = Some(1.0);
        }
    }

    // Generate all pairs (indices for upper triangle)
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let coefficients: Vec<(usize, usize, Option<f64>)> = pairs
        .par_iter()
        .map(|&(i, j)| (i, j, pearson_correlation(&columns[i].1, &columns[j].1)))
        .collect();

    for (i, j, corr) in coefficients {
        values[i][j] = corr;
        values[j][i] = corr;
    }

    CorrelationMatrix {
        columns: columns.iter().map(|(name, _)| name.clone()).collect(),
        values,
    }
}

/// Pearson correlation over complete pairs using Welford's single-pass update.
///
/// Returns `None` for fewer than two complete pairs or zero variance; the
/// result is clamped to [-1, 1] against rounding drift.
pub fn pearson_correlation(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
