//! Year-over-year differences and equal-width binning

use serde::Serialize;

/// Bin count used by the difference histograms
pub const DEFAULT_BINS: usize = 20;

/// Equal-width histogram over `[lower, lower + width * counts.len()]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub lower: f64,
    pub width: f64,
    pub counts: Vec<u32>,
}

impl Histogram {
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Left and right edge of bin `i`
    pub fn bin_range(&self, i: usize) -> (f64, f64) {
        let left = self.lower + self.width * i as f64;
        (left, left + self.width)
    }
}

/// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// The maximum falls into the last bin. A range of zero width is widened to
/// `value ± 0.5`. No values gives all-zero counts over `[0, 1]`.
pub fn equal_width_histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    if finite.is_empty() {
        return Histogram {
            lower: 0.0,
            width: 1.0 / bins as f64,
            counts: vec![0; bins],
        };
    }

    let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max - min == 0.0 {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0u32; bins];
    for v in finite {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram {
        lower: min,
        width,
        counts,
    }
}

/// Differences between two yearly columns and their distribution
#[derive(Debug, Clone, Serialize)]
pub struct DifferenceSummary {
    /// `to - from` for every row where both values are present
    pub differences: Vec<f64>,
    pub histogram: Histogram,
    /// Strictly positive differences
    pub positive: u32,
    /// Strictly negative differences
    pub negative: u32,
}

/// Compute `to[i] - from[i]` over rows where both sides are present
pub fn differences(from: &[Option<f64>], to: &[Option<f64>]) -> Vec<f64> {
    from.iter()
        .zip(to.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => Some(b - a),
            _ => None,
        })
        .collect()
}

pub fn difference_summary(from: &[Option<f64>], to: &[Option<f64>], bins: usize) -> DifferenceSummary {
    let differences = differences(from, to);
    let histogram = equal_width_histogram(&differences, bins);
    let positive = differences.iter().filter(|d| **d > 0.0).count() as u32;
    let negative = differences.iter().filter(|d| **d < 0.0).count() as u32;

    DifferenceSummary {
        differences,
        histogram,
        positive,
        negative,
    }
}
