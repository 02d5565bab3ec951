//! Percentage variation between a baseline and a final value

use serde::{Serialize, Serializer};

/// Label shown for a change away from a zero baseline
pub const INFINITE_INCREASE_LABEL: &str = "Aumento Infinito";

/// Result of a percentage variation.
///
/// A zero baseline with a non-zero final value has no finite percentage; it is
/// kept as its own variant so numeric aggregation can skip it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variation {
    Percent(f64),
    InfiniteIncrease,
}

impl Variation {
    /// Numeric value, `None` for the infinite marker
    pub fn as_percent(&self) -> Option<f64> {
        match self {
            Variation::Percent(p) => Some(*p),
            Variation::InfiniteIncrease => None,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Variation::InfiniteIncrease)
    }
}

impl std::fmt::Display for Variation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variation::Percent(p) => write!(f, "{:.2}", p),
            Variation::InfiniteIncrease => f.write_str(INFINITE_INCREASE_LABEL),
        }
    }
}

impl Serialize for Variation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Variation::Percent(p) => serializer.serialize_f64(*p),
            Variation::InfiniteIncrease => serializer.serialize_str(INFINITE_INCREASE_LABEL),
        }
    }
}

/// `(final - baseline) / |baseline| * 100`, `None` when either side is missing
pub fn percentage_variation(baseline: Option<f64>, last: Option<f64>) -> Option<Variation> {
    let (baseline, last) = (baseline?, last?);
    if baseline == 0.0 {
        if last == 0.0 {
            Some(Variation::Percent(0.0))
        } else {
            Some(Variation::InfiniteIncrease)
        }
    } else {
        Some(Variation::Percent((last - baseline) / baseline.abs() * 100.0))
    }
}

/// Step-over-step variation of an ordered series.
///
/// The first point is 0. A step away from a zero (or missing) previous value
/// is also reported as 0 so the series always stays plottable.
pub fn step_variations<K: Copy>(series: &[(K, Option<f64>)]) -> Vec<(K, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(i, &(key, value))| {
            if i == 0 {
                return (key, 0.0);
            }
            let step = match (series[i - 1].1, value) {
                (Some(prev), Some(cur)) if prev != 0.0 => (cur - prev) / prev * 100.0,
                _ => 0.0,
            };
            (key, step)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_variation() {
        assert_eq!(
            percentage_variation(Some(100.0), Some(150.0)),
            Some(Variation::Percent(50.0))
        );
        assert_eq!(
            percentage_variation(Some(8.0), Some(6.0)),
            Some(Variation::Percent(-25.0))
        );
    }

    #[test]
    fn test_negative_baseline_uses_absolute_value() {
        assert_eq!(
            percentage_variation(Some(-10.0), Some(-5.0)),
            Some(Variation::Percent(50.0))
        );
    }

    #[test]
    fn test_zero_baseline() {
        assert_eq!(percentage_variation(Some(0.0), Some(0.0)), Some(Variation::Percent(0.0)));
        assert_eq!(
            percentage_variation(Some(0.0), Some(50.0)),
            Some(Variation::InfiniteIncrease)
        );
        assert!(Variation::InfiniteIncrease.as_percent().is_none());
    }

    #[test]
    fn test_missing_inputs() {
        assert_eq!(percentage_variation(None, Some(1.0)), None);
        assert_eq!(percentage_variation(Some(1.0), None), None);
    }

    #[test]
    fn test_infinite_serializes_as_label() {
        let json = serde_json::to_string(&vec![
            Variation::Percent(12.5),
            Variation::InfiniteIncrease,
        ])
        .unwrap();
        assert_eq!(json, r#"[12.5,"Aumento Infinito"]"#);
    }

    #[test]
    fn test_step_variations() {
        let steps = step_variations(&[(2020, Some(10.0)), (2021, Some(15.0)), (2022, Some(12.0))]);
        assert_eq!(steps[0], (2020, 0.0));
        assert_eq!(steps[1], (2021, 50.0));
        assert!((steps[2].1 - (-20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_step_variation_from_zero_is_zero() {
        let steps = step_variations(&[("a", Some(0.0)), ("b", Some(4.0))]);
        assert_eq!(steps, vec![("a", 0.0), ("b", 0.0)]);
    }
}
