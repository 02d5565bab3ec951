//! Distribution of year-over-year INDE differences for turning point students

use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

use super::chart::{Chart, Plot};
use super::filters::{join_labels, Filters};
use super::output::{Metric, NamedTable, ViewOutput};
use super::View;
use crate::pipeline::{
    difference_summary, numeric_column, text_column, Dataset, DifferenceSummary, Histogram,
    Indicator, TurningPoint, Year, DEFAULT_BINS, TURNING_POINT,
};

fn histogram_frame(histogram: &Histogram) -> PolarsResult<DataFrame> {
    let ranges: Vec<(f64, f64)> = (0..histogram.bins()).map(|i| histogram.bin_range(i)).collect();
    DataFrame::new(vec![
        Column::new("Início".into(), ranges.iter().map(|r| r.0).collect::<Vec<_>>()),
        Column::new("Fim".into(), ranges.iter().map(|r| r.1).collect::<Vec<_>>()),
        Column::new("Número de Alunos".into(), histogram.counts.clone()),
    ])
}

pub(super) fn build(dataset: &Dataset, filters: &Filters) -> Result<ViewOutput> {
    let df = dataset.complete();
    let selected = &filters.turning_points;

    let mut flags: Vec<Vec<Option<TurningPoint>>> = Vec::with_capacity(3);
    let mut inde: Vec<Vec<Option<f64>>> = Vec::with_capacity(3);
    for year in Year::ALL {
        flags.push(
            text_column(df, &year.column(TURNING_POINT))?
                .into_iter()
                .map(|v| v.and_then(|s| TurningPoint::from_label(&s)))
                .collect(),
        );
        inde.push(numeric_column(df, &Indicator::Inde.column(year))?);
    }

    // Students with a turning point in some year and INDE for all three years,
    // then narrowed to the flags the user picked (matched in any year)
    let rows: Vec<usize> = (0..df.height())
        .filter(|&i| flags.iter().any(|f| f[i] == Some(TurningPoint::Yes)))
        .filter(|&i| inde.iter().all(|v| v[i].is_some()))
        .filter(|&i| {
            flags
                .iter()
                .any(|f| f[i].map(|flag| selected.contains(&flag)).unwrap_or(false))
        })
        .collect();
    debug!(rows = rows.len(), "turning point rows selected");

    let pick = |values: &[Option<f64>]| -> Vec<Option<f64>> { rows.iter().map(|&i| values[i]).collect() };
    let (a, b, c) = (pick(&inde[0]), pick(&inde[1]), pick(&inde[2]));
    let first: DifferenceSummary = difference_summary(&a, &b, DEFAULT_BINS);
    let second: DifferenceSummary = difference_summary(&b, &c, DEFAULT_BINS);

    let mut columns = Vec::new();
    for (year, column) in Year::ALL.iter().zip(flags.iter()) {
        columns.push(Column::new(
            year.column(TURNING_POINT).into(),
            rows.iter()
                .map(|&i| column[i].map(|f| f.label()))
                .collect::<Vec<_>>(),
        ));
    }
    for (year, values) in Year::ALL.iter().zip([&a, &b, &c]) {
        columns.push(Column::new(Indicator::Inde.column(*year).into(), values.clone()));
    }
    columns.push(Column::new("DIF_INDE_2020_2021".into(), first.differences.clone()));
    columns.push(Column::new("DIF_INDE_2021_2022".into(), second.differences.clone()));
    let frame = DataFrame::new(columns)?;

    let mut output = ViewOutput::new(View::IndeDifference);
    output.details = vec![
        format!("Pontos de Virada Selecionados: {}", join_labels(selected)),
        "Tipo de Gráfico: Histograma".to_string(),
    ];
    output.tables.push(NamedTable::new(
        "diferenca_inde",
        "Diferença no INDE por Aluno",
        frame,
    ));
    output.tables.push(NamedTable::new(
        "diferenca_inde_2020_2021_histograma",
        "Histograma da Diferença 2020-2021",
        histogram_frame(&first.histogram)?,
    ));
    output.tables.push(NamedTable::new(
        "diferenca_inde_2021_2022_histograma",
        "Histograma da Diferença 2021-2022",
        histogram_frame(&second.histogram)?,
    ));

    output.metrics = vec![
        Metric::new("Diferença Positiva INDE 2020-2021", first.positive.to_string()),
        Metric::new("Diferença Negativa INDE 2020-2021", first.negative.to_string()),
        Metric::new("Diferença Positiva INDE 2021-2022", second.positive.to_string()),
        Metric::new("Diferença Negativa INDE 2021-2022", second.negative.to_string()),
    ];

    output.charts.push(Chart::new(
        "diferenca_inde_2020_2021_grafico",
        "Diferença no INDE de 2020 para 2021",
        "Diferença no INDE",
        "Número de Alunos",
        Plot::Histogram(first.histogram),
    ));
    output.charts.push(Chart::new(
        "diferenca_inde_2021_2022_grafico",
        "Diferença no INDE de 2021 para 2022",
        "Diferença no INDE",
        "Número de Alunos",
        Plot::Histogram(second.histogram),
    ));

    Ok(output)
}
