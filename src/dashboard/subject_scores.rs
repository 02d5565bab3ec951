//! 2022 subject score distributions and descriptive statistics

use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

use super::chart::{Chart, ChartKind, Plot, Series};
use super::filters::{join_labels, Filters};
use super::output::{fmt_opt, Metric, NamedTable, ViewOutput};
use super::View;
use crate::pipeline::{
    combined_overview, describe, equal_width_histogram, numeric_column, sample_mean, Dataset,
    Describe, Subject, DEFAULT_BINS,
};

/// Row labels of the statistics table, aligned with [`Describe::LABELS`]
const STAT_LABELS: [&str; 8] = [
    "Contagem",
    "Média",
    "Desvio Padrão",
    "Mínimo",
    "1º Quartil (25%)",
    "Mediana (50%)",
    "3º Quartil (75%)",
    "Máximo",
];

/// Scores of the three subjects over rows where all three parsed.
///
/// Reads the table as loaded, not the complete-case one: only the subject
/// columns themselves have to be present.
pub(crate) fn subject_scores(dataset: &Dataset) -> Result<Vec<(Subject, Vec<f64>)>> {
    let df = dataset.raw();
    let mut columns = Vec::with_capacity(Subject::ALL.len());
    for subject in Subject::ALL {
        columns.push(numeric_column(df, subject.column())?);
    }

    let keep: Vec<usize> = (0..df.height())
        .filter(|&i| columns.iter().all(|c| c[i].is_some()))
        .collect();
    debug!(rows = keep.len(), "rows with all subject scores");

    Ok(Subject::ALL
        .iter()
        .zip(columns.iter())
        .map(|(subject, values)| (*subject, keep.iter().filter_map(|&i| values[i]).collect()))
        .collect())
}

pub(super) fn build(dataset: &Dataset, filters: &Filters) -> Result<ViewOutput> {
    let selected = filters.selected_subjects();
    let kind = filters.chart_or(ChartKind::Box, &ChartKind::DISTRIBUTION);
    let scores = subject_scores(dataset)?;
    let chosen: Vec<&(Subject, Vec<f64>)> = scores
        .iter()
        .filter(|(s, _)| selected.contains(s))
        .collect();

    let stats: Vec<Describe> = chosen.iter().map(|(_, v)| describe(v)).collect();

    let mut stat_columns = vec![Column::new("Estatística".into(), STAT_LABELS.to_vec())];
    for ((subject, _), d) in chosen.iter().zip(stats.iter()) {
        stat_columns.push(Column::new(subject.label().into(), d.values().to_vec()));
    }
    let summary = DataFrame::new(stat_columns)?;

    let data = DataFrame::new(
        chosen
            .iter()
            .map(|(subject, values)| Column::new(subject.label().into(), values.clone()))
            .collect(),
    )?;

    let means: Vec<Option<f64>> = scores.iter().map(|(_, v)| sample_mean(v)).collect();
    let means_frame = DataFrame::new(vec![
        Column::new(
            "Disciplina".into(),
            scores.iter().map(|(s, _)| s.label()).collect::<Vec<_>>(),
        ),
        Column::new("Média".into(), means.clone()),
    ])?;

    let mut output = ViewOutput::new(View::SubjectScores);
    output.details = vec![
        format!("Disciplinas Selecionadas: {}", join_labels(&selected)),
        format!("Tipo de gráfico: {}", kind),
    ];
    output.tables.push(
        NamedTable::new(
            "resumo_estatistico",
            "Resumo Estatístico de Notas por Disciplina",
            summary,
        )
        .with_index("Estatística"),
    );
    output.tables.push(
        NamedTable::new(
            "media_disciplinas",
            "Média das Notas por Disciplina (2022)",
            means_frame,
        )
        .with_index("Disciplina"),
    );
    output.tables.push(NamedTable::new("notas", "Notas Filtradas", data));

    let overview = combined_overview(&stats);
    output.metrics = vec![
        Metric::new("Média das Notas", fmt_opt(overview.mean_of_means)),
        Metric::new("Nota Máxima", fmt_opt(overview.max_of_max)),
        Metric::new("Nota Mínima", fmt_opt(overview.min_of_min)),
        Metric::new("Desvio Padrão", fmt_opt(overview.std_of_stds)),
    ];

    match kind {
        ChartKind::Histogram => {
            for (subject, values) in &chosen {
                output.charts.push(Chart::new(
                    &format!("grafico_notas_{}", subject.label().to_lowercase()),
                    &format!("Histograma das Notas de {} (2022)", subject),
                    "Notas",
                    "Frequência",
                    Plot::Histogram(equal_width_histogram(values, DEFAULT_BINS)),
                ));
            }
        }
        _ => {
            output.charts.push(Chart::new(
                "grafico_notas",
                "Distribuição das Notas por Disciplina (2022)",
                "Disciplinas",
                "Notas",
                Plot::Distribution {
                    kind,
                    samples: chosen
                        .iter()
                        .map(|(s, v)| (s.label().to_string(), v.clone()))
                        .collect(),
                },
            ));
        }
    }
    output.charts.push(Chart::new(
        "grafico_media_disciplinas",
        "Média das Notas por Disciplina (2022)",
        "Disciplina",
        "Média",
        Plot::Categories {
            kind: ChartKind::Bar,
            categories: scores.iter().map(|(s, _)| s.label().to_string()).collect(),
            series: vec![Series::new("Média", means)],
            stacked: false,
        },
    ));

    Ok(output)
}
