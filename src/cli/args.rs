//! Command-line argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::dashboard::{ChartKind, ColorScale, Filters, View};
use crate::pipeline::{Pedra, Subject, TurningPoint, Year, DEFAULT_DATASET_PATH};
use crate::report::ExportOptions;

/// Default directory for exported files
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Default archive written by `bundle`
pub const DEFAULT_BUNDLE_PATH: &str = "pededash_bundle.zip";

/// Pededash - Analytics views over the PEDE educational outcomes dataset
#[derive(Parser, Debug)]
#[command(name = "pededash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (semicolon-delimited CSV or Parquet)
    #[arg(short, long, global = true, default_value = DEFAULT_DATASET_PATH)]
    pub input: PathBuf,

    /// Diagnostic log level written to stderr (trace, debug, info, warn, error).
    /// Overrides RUST_LOG when given.
    #[arg(long, global = true, value_parser = validate_log_level)]
    pub log_level: Option<String>,

    /// Skip interactive prompts
    #[arg(long, global = true, default_value = "false")]
    pub no_confirm: bool,
}

/// Export flags shared by every view
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ExportArgs {
    /// Directory for CSV exports (defaults to 'exports' when --json or --chart-image is given)
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Leave the index column out of CSV exports
    #[arg(long, default_value = "false")]
    pub no_index: bool,

    /// Also write a JSON report with metadata, tables and metrics
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Also render every chart as an SVG image
    #[arg(long, default_value = "false")]
    pub chart_image: bool,
}

impl ExportArgs {
    /// Export settings, `None` when nothing was requested
    pub fn options(&self) -> Option<ExportOptions> {
        if self.export_dir.is_none() && !self.json && !self.chart_image {
            return None;
        }
        let dir = self
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));
        Some(ExportOptions {
            dir,
            include_index: !self.no_index,
            json: self.json,
            chart_images: self.chart_image,
        })
    }
}

/// Year multi-select; omitted means all years, a bare flag means none
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct YearArgs {
    /// Years to include (comma-separated: 2020,2021,2022)
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub years: Option<Vec<Year>>,
}

/// Bar or line chart selection
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct SeriesChartArgs {
    /// Chart type: bar or line
    #[arg(long, value_parser = validate_series_chart)]
    pub chart: Option<ChartKind>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Turning point Sim/Não counts per year with percentage variation
    TurningPoints {
        #[command(flatten)]
        years: YearArgs,
        #[command(flatten)]
        chart: SeriesChartArgs,
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Classify every student's INDE trajectory from 2020 to 2022
    IndeTrend {
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Mean INDE per year for students with and without a turning point
    IndeEvolution {
        #[command(flatten)]
        years: YearArgs,
        #[command(flatten)]
        chart: SeriesChartArgs,
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Mean INDE per year grouped by the 2020 rock tier
    PedraComparison {
        /// Rock tiers to include (comma-separated: topazio,ametista,agata,quartzo)
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        tiers: Option<Vec<Pedra>>,
        #[command(flatten)]
        chart: SeriesChartArgs,
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Rock tier counts per institution for 2020 and 2021
    InstitutionDistribution {
        /// 2020 institutions to include (comma-separated, default all)
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        institutions_2020: Option<Vec<String>>,
        /// 2021 institutions to include (comma-separated, default all)
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        institutions_2021: Option<Vec<String>>,
        #[command(flatten)]
        chart: SeriesChartArgs,
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Pearson correlation between the indicators of all three years
    IndicatorCorrelation {
        /// Heatmap color scale
        #[arg(long, value_enum, default_value_t = ColorScale::RdBuR)]
        color_scale: ColorScale,
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Year-over-year INDE differences for turning point students
    IndeDifference {
        /// Turning point flags matched in any year (comma-separated: sim,nao)
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        turning_points: Option<Vec<TurningPoint>>,
        #[command(flatten)]
        export: ExportArgs,
    },

    /// 2022 Portuguese, Math and English score statistics
    SubjectScores {
        /// Subjects to include (comma-separated: portugues,matematica,ingles)
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        subjects: Option<Vec<Subject>>,
        /// Chart type: box, violin or histogram
        #[arg(long, value_parser = validate_distribution_chart)]
        chart: Option<ChartKind>,
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Number of students per rock tier and year
    PedraFrequency {
        #[command(flatten)]
        years: YearArgs,
        #[command(flatten)]
        chart: SeriesChartArgs,
        #[command(flatten)]
        export: ExportArgs,
    },

    /// Show rows loaded, rows kept by cleaning and missing values per column
    Summary,

    /// Run all views with default selections and package every export into a zip
    Bundle {
        /// Archive path
        #[arg(short, long, default_value = DEFAULT_BUNDLE_PATH)]
        output: PathBuf,

        /// Include SVG chart images
        #[arg(long, default_value = "false")]
        chart_image: bool,

        /// Leave the index column out of CSV exports
        #[arg(long, default_value = "false")]
        no_index: bool,
    },
}

impl Commands {
    /// The view this command runs, if it is a view command
    pub fn view(&self) -> Option<View> {
        match self {
            Commands::TurningPoints { .. } => Some(View::TurningPoints),
            Commands::IndeTrend { .. } => Some(View::IndeTrend),
            Commands::IndeEvolution { .. } => Some(View::IndeEvolution),
            Commands::PedraComparison { .. } => Some(View::PedraComparison),
            Commands::InstitutionDistribution { .. } => Some(View::InstitutionDistribution),
            Commands::IndicatorCorrelation { .. } => Some(View::IndicatorCorrelation),
            Commands::IndeDifference { .. } => Some(View::IndeDifference),
            Commands::SubjectScores { .. } => Some(View::SubjectScores),
            Commands::PedraFrequency { .. } => Some(View::PedraFrequency),
            Commands::Summary | Commands::Bundle { .. } => None,
        }
    }

    /// Selections given on the command line; everything else keeps its default
    pub fn filters(&self) -> Filters {
        let mut filters = Filters::default();
        match self {
            Commands::TurningPoints { years, chart, .. }
            | Commands::IndeEvolution { years, chart, .. }
            | Commands::PedraFrequency { years, chart, .. } => {
                if let Some(years) = &years.years {
                    filters.years = years.clone();
                }
                filters.chart = chart.chart;
            }
            Commands::PedraComparison { tiers, chart, .. } => {
                if let Some(tiers) = tiers {
                    filters.tiers = tiers.clone();
                }
                filters.chart = chart.chart;
            }
            Commands::InstitutionDistribution {
                institutions_2020,
                institutions_2021,
                chart,
                ..
            } => {
                filters.institutions_2020 = institutions_2020.clone();
                filters.institutions_2021 = institutions_2021.clone();
                filters.chart = chart.chart;
            }
            Commands::IndicatorCorrelation { color_scale, .. } => {
                filters.color_scale = *color_scale;
            }
            Commands::IndeDifference { turning_points, .. } => {
                if let Some(flags) = turning_points {
                    filters.turning_points = flags.clone();
                }
            }
            Commands::SubjectScores {
                subjects, chart, ..
            } => {
                if let Some(subjects) = subjects {
                    filters.subjects = subjects.clone();
                }
                filters.chart = *chart;
            }
            Commands::IndeTrend { .. } | Commands::Summary | Commands::Bundle { .. } => {}
        }
        filters
    }

    /// Export flags of a view command
    pub fn export(&self) -> Option<&ExportArgs> {
        match self {
            Commands::TurningPoints { export, .. }
            | Commands::IndeTrend { export }
            | Commands::IndeEvolution { export, .. }
            | Commands::PedraComparison { export, .. }
            | Commands::InstitutionDistribution { export, .. }
            | Commands::IndicatorCorrelation { export, .. }
            | Commands::IndeDifference { export, .. }
            | Commands::SubjectScores { export, .. }
            | Commands::PedraFrequency { export, .. } => Some(export),
            Commands::Summary | Commands::Bundle { .. } => None,
        }
    }
}

/// Validator for log_level parameter
fn validate_log_level(s: &str) -> Result<String, String> {
    let level = s.to_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(level),
        _ => Err(format!(
            "log level must be one of trace, debug, info, warn, error, got '{}'",
            s
        )),
    }
}

fn validate_chart(s: &str, allowed: &[ChartKind]) -> Result<ChartKind, String> {
    let kind = ChartKind::from_str(s, true).map_err(|_| format!("'{}' is not a chart type", s))?;
    if allowed.contains(&kind) {
        Ok(kind)
    } else {
        let names: Vec<String> = allowed
            .iter()
            .filter_map(|k| k.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        Err(format!(
            "chart must be one of {}, got '{}'",
            names.join(", "),
            s
        ))
    }
}

/// Validator for bar/line chart parameters
fn validate_series_chart(s: &str) -> Result<ChartKind, String> {
    validate_chart(s, &ChartKind::SERIES)
}

/// Validator for the subject scores chart parameter
fn validate_distribution_chart(s: &str) -> Result<ChartKind, String> {
    validate_chart(s, &ChartKind::DISTRIBUTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_log_level() {
        assert_eq!(validate_log_level("DEBUG").unwrap(), "debug");
        assert!(validate_log_level("verbose").is_err());
    }

    #[test]
    fn test_validate_chart_restricts_kinds() {
        assert_eq!(validate_series_chart("line").unwrap(), ChartKind::Line);
        assert!(validate_series_chart("violin").is_err());
        assert_eq!(
            validate_distribution_chart("histogram").unwrap(),
            ChartKind::Histogram
        );
        assert!(validate_distribution_chart("bar").is_err());
    }

    #[test]
    fn test_export_options_only_when_requested() {
        assert!(ExportArgs::default().options().is_none());

        let json_only = ExportArgs {
            json: true,
            ..ExportArgs::default()
        };
        let options = json_only.options().unwrap();
        assert_eq!(options.dir, PathBuf::from(DEFAULT_EXPORT_DIR));
        assert!(options.include_index);

        let no_index = ExportArgs {
            export_dir: Some(PathBuf::from("out")),
            no_index: true,
            ..ExportArgs::default()
        };
        assert!(!no_index.options().unwrap().include_index);
    }
}
