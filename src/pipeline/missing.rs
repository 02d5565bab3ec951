//! Missing value analysis and complete-case cleaning

use anyhow::Result;
use polars::prelude::*;

/// Analyze missing values in the dataset.
///
/// Returns `(column, missing_ratio)` pairs sorted by ratio, highest first.
pub fn analyze_missing_values(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = df
        .get_columns()
        .iter()
        .map(|column| {
            (
                column.name().to_string(),
                column.null_count() as f64 / rows,
            )
        })
        .collect();

    // Sort by missing ratio descending
    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(missing_ratios)
}

/// Row mask that is `true` where no column of the row is null
fn complete_rows(df: &DataFrame) -> BooleanChunked {
    df.get_columns().iter().filter(|c| c.null_count() > 0).fold(
        BooleanChunked::full("complete".into(), true, df.height()),
        |mask, column| &mask & &column.is_not_null(),
    )
}

/// Per-row flag: `true` when no column of the row is null
pub fn complete_case_mask(df: &DataFrame) -> Vec<bool> {
    complete_rows(df)
        .into_iter()
        .map(|flag| flag.unwrap_or(false))
        .collect()
}

/// Drop every row that has at least one missing field
pub fn drop_incomplete_rows(df: &DataFrame) -> PolarsResult<DataFrame> {
    if df.get_columns().iter().all(|c| c.null_count() == 0) {
        return Ok(df.clone());
    }
    df.filter(&complete_rows(df))
}
