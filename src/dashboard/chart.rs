//! Chart descriptions produced by the views.
//!
//! A view only says *what* to draw; `report::chart` turns a [`Chart`] into an
//! image.

use clap::ValueEnum;
use serde::Serialize;

use crate::pipeline::Histogram;

/// Closed set of chart types a view can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[value(alias = "barras")]
    Bar,
    #[value(alias = "linhas")]
    Line,
    #[value(alias = "boxplot")]
    Box,
    Violin,
    #[value(alias = "histograma")]
    Histogram,
}

impl ChartKind {
    /// Kinds available to views that plot one value per category
    pub const SERIES: [ChartKind; 2] = [ChartKind::Bar, ChartKind::Line];
    /// Kinds available to the subject score distribution
    pub const DISTRIBUTION: [ChartKind; 3] = [ChartKind::Box, ChartKind::Violin, ChartKind::Histogram];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Barras",
            ChartKind::Line => "Linhas",
            ChartKind::Box => "Boxplot",
            ChartKind::Violin => "Violin Plot",
            ChartKind::Histogram => "Histograma",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Color scales offered for the correlation heatmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ValueEnum)]
pub enum ColorScale {
    #[default]
    #[value(name = "rdbu_r", alias = "RdBu_r")]
    #[serde(rename = "RdBu_r")]
    RdBuR,
    #[value(alias = "Bluered")]
    Bluered,
    #[value(alias = "Viridis")]
    Viridis,
    #[value(alias = "Spectral")]
    Spectral,
    #[value(alias = "Picnic")]
    Picnic,
}

impl ColorScale {
    pub fn label(&self) -> &'static str {
        match self {
            ColorScale::RdBuR => "RdBu_r",
            ColorScale::Bluered => "Bluered",
            ColorScale::Viridis => "Viridis",
            ColorScale::Spectral => "Spectral",
            ColorScale::Picnic => "Picnic",
        }
    }
}

/// One named series over the chart's categories
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn from_counts(name: impl Into<String>, counts: &[u32]) -> Self {
        Self::new(name, counts.iter().map(|&c| Some(c as f64)).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Plot {
    /// Bars or lines over labelled categories
    Categories {
        kind: ChartKind,
        categories: Vec<String>,
        series: Vec<Series>,
        stacked: bool,
    },
    /// Square matrix over `[-1, 1]`
    Heatmap {
        labels: Vec<String>,
        values: Vec<Vec<Option<f64>>>,
        scale: ColorScale,
    },
    /// Pre-binned counts
    Histogram(Histogram),
    /// Box or violin per named sample
    Distribution {
        kind: ChartKind,
        samples: Vec<(String, Vec<f64>)>,
    },
}

/// A chart ready to render. `name` becomes the image file stem.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub plot: Plot,
}

impl Chart {
    pub fn new(name: &str, title: &str, x_label: &str, y_label: &str, plot: Plot) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            plot,
        }
    }
}
