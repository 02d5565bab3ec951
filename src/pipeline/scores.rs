//! Descriptive statistics for subject scores

use serde::Serialize;

/// Summary statistics of one sample, in the usual `describe` layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1)
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Describe {
    /// Row labels matching the field order of [`Describe::values`]
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    pub fn values(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

pub fn describe(values: &[f64]) -> Describe {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Describe {
        count: sorted.len(),
        mean: sample_mean(&sorted),
        std: sample_std(&sorted),
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

pub fn sample_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Standard deviation with Bessel's correction; needs at least two values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = sample_mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Linearly interpolated quantile of an ascending slice
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Box plot geometry with 1.5 IQR whiskers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= lo_fence && *v <= hi_fence)
        .collect();
    let lower_whisker = inside.first().copied().unwrap_or(q1);
    let upper_whisker = inside.last().copied().unwrap_or(q3);
    let outliers = sorted
        .into_iter()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Gaussian kernel density estimate on `points` evenly spaced positions
/// between the sample min and max (Silverman bandwidth).
pub fn density(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() || points == 0 {
        return Vec::new();
    }

    let n = sorted.len() as f64;
    let std = sample_std(&sorted).unwrap_or(0.0);
    let bandwidth = if std > 0.0 { 1.06 * std * n.powf(-0.2) } else { 1.0 };

    let min = sorted.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sorted.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = if points > 1 { (max - min) / (points - 1) as f64 } else { 0.0 };
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = min + step * i as f64;
            let d: f64 = sorted
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum();
            (x, d * norm)
        })
        .collect()
}

/// Overview across subjects, built from each subject's [`Describe`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedOverview {
    pub mean_of_means: Option<f64>,
    pub max_of_max: Option<f64>,
    pub min_of_min: Option<f64>,
    /// Sample std of the per-subject standard deviations
    pub std_of_stds: Option<f64>,
}

pub fn combined_overview(stats: &[Describe]) -> CombinedOverview {
    let means: Vec<f64> = stats.iter().filter_map(|d| d.mean).collect();
    let stds: Vec<f64> = stats.iter().filter_map(|d| d.std).collect();

    CombinedOverview {
        mean_of_means: sample_mean(&means),
        max_of_max: stats.iter().filter_map(|d| d.max).reduce(f64::max),
        min_of_min: stats.iter().filter_map(|d| d.min).reduce(f64::min),
        std_of_stds: sample_std(&stds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map(|a| (a - b).abs() < 1e-9).unwrap_or(false)
    }

    #[test]
    fn test_describe_matches_linear_quantiles() {
        let stats = describe(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert!(close(stats.mean, 2.5));
        assert!(close(stats.q25, 1.75));
        assert!(close(stats.median, 2.5));
        assert!(close(stats.q75, 3.25));
        assert!(close(stats.std, (5.0f64 / 3.0).sqrt()));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(4.0));
    }

    #[test]
    fn test_describe_empty_sample() {
        let stats = describe(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.median, None);
    }

    #[test]
    fn test_single_value_has_no_std() {
        assert_eq!(sample_std(&[3.0]), None);
    }

    #[test]
    fn test_box_stats_flags_outliers() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.upper_whisker, 5.0);
        assert_eq!(stats.lower_whisker, 1.0);
    }

    #[test]
    fn test_density_covers_sample_range() {
        let curve = density(&[1.0, 2.0, 2.5, 3.0], 16);
        assert_eq!(curve.len(), 16);
        assert_eq!(curve[0].0, 1.0);
        assert!(curve.iter().all(|(_, d)| *d > 0.0));
    }

    #[test]
    fn test_combined_overview_needs_two_subjects_for_std() {
        let one = describe(&[1.0, 2.0, 3.0]);
        let overview = combined_overview(std::slice::from_ref(&one));
        assert!(close(overview.mean_of_means, 2.0));
        assert_eq!(overview.std_of_stds, None);

        let two = describe(&[0.0, 4.0, 8.0]);
        let overview = combined_overview(&[one, two]);
        assert_eq!(overview.max_of_max, Some(8.0));
        assert_eq!(overview.min_of_min, Some(0.0));
        assert!(overview.std_of_stds.is_some());
    }
}
