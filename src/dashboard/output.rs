//! What a view hands to the presentation layer

use polars::prelude::*;
use serde::Serialize;

use super::chart::Chart;
use super::View;

/// A derived table. When `index` is set, that column plays the role of the
/// row index (shown first, optionally left out of CSV exports).
#[derive(Debug, Clone)]
pub struct NamedTable {
    pub name: String,
    pub title: String,
    pub frame: DataFrame,
    pub index: Option<String>,
}

impl NamedTable {
    pub fn new(name: &str, title: &str, frame: DataFrame) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            frame,
            index: None,
        }
    }

    pub fn with_index(mut self, column: &str) -> Self {
        self.index = Some(column.to_string());
        self
    }

    /// The table without its index column
    pub fn without_index(&self) -> PolarsResult<DataFrame> {
        match &self.index {
            Some(index) => self.frame.drop(index),
            None => Ok(self.frame.clone()),
        }
    }
}

/// A headline number, optionally with a change indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub delta: Option<String>,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta: None,
        }
    }

    pub fn with_delta(mut self, delta: Option<String>) -> Self {
        self.delta = delta;
        self
    }
}

/// Everything one view produced for one request
#[derive(Debug, Clone)]
pub struct ViewOutput {
    pub view: View,
    pub title: String,
    /// Human-readable echo of the selections in effect
    pub details: Vec<String>,
    pub tables: Vec<NamedTable>,
    pub metrics: Vec<Metric>,
    pub charts: Vec<Chart>,
}

impl ViewOutput {
    pub fn new(view: View) -> Self {
        Self {
            view,
            title: view.title().to_string(),
            details: Vec::new(),
            tables: Vec::new(),
            metrics: Vec::new(),
            charts: Vec::new(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&NamedTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn metric(&self, label: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.label == label)
    }
}

/// Format an optional number with two decimals, `-` when missing
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

/// Format a percentage delta (`12.34%`)
pub fn fmt_pct(value: f64) -> String {
    format!("{:.2}%", value)
}
