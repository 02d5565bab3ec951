//! Dashboard views - one filter -> aggregate -> metric pipeline per view

pub mod chart;
pub mod filters;
pub mod output;

mod indicator_correlation;
mod inde_difference;
mod inde_evolution;
mod inde_trend;
mod institution_distribution;
mod pedra_comparison;
mod pedra_frequency;
mod subject_scores;
mod turning_points;

pub use chart::{Chart, ChartKind, ColorScale, Plot, Series};
pub use filters::Filters;
pub use inde_trend::{student_trends, StudentTrend};
pub use output::{Metric, NamedTable, ViewOutput};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use crate::pipeline::Dataset;

/// The nine analytic views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    TurningPoints,
    IndeTrend,
    IndeEvolution,
    PedraComparison,
    InstitutionDistribution,
    IndicatorCorrelation,
    IndeDifference,
    SubjectScores,
    PedraFrequency,
}

impl View {
    pub const ALL: [View; 9] = [
        View::TurningPoints,
        View::IndeTrend,
        View::IndeEvolution,
        View::PedraComparison,
        View::InstitutionDistribution,
        View::IndicatorCorrelation,
        View::IndeDifference,
        View::SubjectScores,
        View::PedraFrequency,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::TurningPoints => "Ponto de Virada com Variação Percentual",
            View::IndeTrend => "Categorização INDE",
            View::IndeEvolution => "Evolução do INDE ao Longo dos Anos",
            View::PedraComparison => "Comparação do INDE por Categoria de Pedra",
            View::InstitutionDistribution => "Distribuição de Pedra por Instituição",
            View::IndicatorCorrelation => "Correlação entre Indicadores (2020 a 2022)",
            View::IndeDifference => "Diferença no INDE entre Anos",
            View::SubjectScores => "Notas por Disciplina (2022)",
            View::PedraFrequency => "Frequência de Alunos por Pedra",
        }
    }

    /// File-name friendly identifier, also the CLI subcommand name
    pub fn slug(&self) -> &'static str {
        match self {
            View::TurningPoints => "turning-points",
            View::IndeTrend => "inde-trend",
            View::IndeEvolution => "inde-evolution",
            View::PedraComparison => "pedra-comparison",
            View::InstitutionDistribution => "institution-distribution",
            View::IndicatorCorrelation => "indicator-correlation",
            View::IndeDifference => "inde-difference",
            View::SubjectScores => "subject-scores",
            View::PedraFrequency => "pedra-frequency",
        }
    }

    /// Compute the view against the shared dataset
    pub fn run(&self, dataset: &Dataset, filters: &Filters) -> Result<ViewOutput> {
        debug!(view = self.slug(), "running view");
        let output = match self {
            View::TurningPoints => turning_points::build(dataset, filters),
            View::IndeTrend => inde_trend::build(dataset, filters),
            View::IndeEvolution => inde_evolution::build(dataset, filters),
            View::PedraComparison => pedra_comparison::build(dataset, filters),
            View::InstitutionDistribution => institution_distribution::build(dataset, filters),
            View::IndicatorCorrelation => indicator_correlation::build(dataset, filters),
            View::IndeDifference => inde_difference::build(dataset, filters),
            View::SubjectScores => subject_scores::build(dataset, filters),
            View::PedraFrequency => pedra_frequency::build(dataset, filters),
        };
        output.with_context(|| format!("Failed to build view '{}'", self.slug()))
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
