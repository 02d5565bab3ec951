//! Three-year trend classification
//!
//! A student's INDE across 2020 -> 2021 -> 2022 is summarised as one of five
//! labels. Rules are evaluated strictly in order; the first match wins.

use serde::Serialize;

/// Trend of a value across three consecutive years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Trend {
    Increase,
    Decrease,
    IncreaseThenDecrease,
    DecreaseThenIncrease,
    Stable,
}

impl Trend {
    /// Fixed display order for trend tables
    pub const ALL: [Trend; 5] = [
        Trend::Increase,
        Trend::Decrease,
        Trend::IncreaseThenDecrease,
        Trend::DecreaseThenIncrease,
        Trend::Stable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Trend::Increase => "Aumento",
            Trend::Decrease => "Queda",
            Trend::IncreaseThenDecrease => "Aumento seguido de queda",
            Trend::DecreaseThenIncrease => "Queda seguida de aumento",
            Trend::Stable => "Estável",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Trend::Increase => 0,
            Trend::Decrease => 1,
            Trend::IncreaseThenDecrease => 2,
            Trend::DecreaseThenIncrease => 3,
            Trend::Stable => 4,
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify the trend of `(first, second, third)`.
///
/// A missing value makes every comparison it takes part in false, so a row
/// with a gap falls through to [`Trend::Stable`] unless an earlier rule
/// matched on the present values. When the first two values tie, only the
/// direction of the second step decides (rules 5 and 6).
pub fn classify_trend(first: Option<f64>, second: Option<f64>, third: Option<f64>) -> Trend {
    let gt = |a: Option<f64>, b: Option<f64>| matches!((a, b), (Some(a), Some(b)) if a > b);
    let lt = |a: Option<f64>, b: Option<f64>| matches!((a, b), (Some(a), Some(b)) if a < b);
    let eq = |a: Option<f64>, b: Option<f64>| matches!((a, b), (Some(a), Some(b)) if a == b);

    if gt(second, first) && gt(third, second) {
        Trend::Increase
    } else if lt(second, first) && lt(third, second) {
        Trend::Decrease
    } else if gt(second, first) && lt(third, second) {
        Trend::IncreaseThenDecrease
    } else if lt(second, first) && gt(third, second) {
        Trend::DecreaseThenIncrease
    } else if eq(first, second) && gt(second, third) {
        Trend::Decrease
    } else if eq(first, second) && lt(second, third) {
        Trend::Increase
    } else {
        Trend::Stable
    }
}

/// Count labels in [`Trend::ALL`] order; absent labels count zero
pub fn count_trends(trends: &[Trend]) -> [u32; 5] {
    let mut counts = [0u32; 5];
    for trend in trends {
        counts[trend.index()] += 1;
    }
    counts
}
