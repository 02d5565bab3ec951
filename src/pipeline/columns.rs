//! Typed column access over the text-loaded table
//!
//! Numeric coercion mirrors a lenient "to number or missing" conversion:
//! anything that does not parse as a finite float becomes `None`.

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::debug;

/// Read a column as floats, coercing malformed cells to `None`
pub fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?;

    let casted = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Failed to cast column '{}' to Float64", name))?;

    let coerced = casted.null_count().saturating_sub(column.null_count());
    if coerced > 0 {
        debug!(column = name, cells = coerced, "non-numeric cells coerced to missing");
    }

    let values = casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Ok(values)
}

/// Count cells per column that are present but not numeric.
///
/// Columns that are absent or cannot be cast are skipped; only columns with at
/// least one malformed cell are returned.
pub fn malformed_numeric_cells(df: &DataFrame, columns: &[String]) -> Vec<(String, usize)> {
    columns
        .iter()
        .filter_map(|name| {
            let column = df.column(name).ok()?;
            let casted = column.cast(&DataType::Float64).ok()?;
            let coerced = casted.null_count().saturating_sub(column.null_count());
            (coerced > 0).then(|| (name.clone(), coerced))
        })
        .collect()
}

/// Read a column as trimmed strings
pub fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?;

    let casted = if column.dtype() == &DataType::String {
        column.clone()
    } else {
        column
            .cast(&DataType::String)
            .with_context(|| format!("Failed to cast column '{}' to String", name))?
    };

    let values = casted
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect();
    Ok(values)
}

/// Keep only the present values
pub fn present(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

/// Mean of the present values, `None` when nothing is present
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}
