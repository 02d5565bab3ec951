//! Turning point counts per year with step-over-step variation

use anyhow::Result;
use polars::prelude::*;

use super::chart::{Chart, ChartKind, Plot, Series};
use super::filters::{join_labels, Filters};
use super::output::{fmt_pct, Metric, NamedTable, ViewOutput};
use super::View;
use crate::pipeline::{step_variations, text_column, Dataset, TurningPoint, Year, TURNING_POINT};

/// `(Sim, Não)` counts of one yearly flag column
fn count_flags(values: &[Option<String>]) -> (u32, u32) {
    values
        .iter()
        .flatten()
        .filter_map(|v| TurningPoint::from_label(v))
        .fold((0, 0), |(yes, no), flag| match flag {
            TurningPoint::Yes => (yes + 1, no),
            TurningPoint::No => (yes, no + 1),
        })
}

pub(super) fn build(dataset: &Dataset, filters: &Filters) -> Result<ViewOutput> {
    let df = dataset.complete();
    let years = filters.selected_years();
    let kind = filters.chart_or(ChartKind::Bar, &ChartKind::SERIES);

    let mut counts: Vec<(Year, u32, u32)> = Vec::with_capacity(years.len());
    for &year in &years {
        let (yes, no) = count_flags(&text_column(df, &year.column(TURNING_POINT))?);
        counts.push((year, yes, no));
    }

    let yes_steps = step_variations(
        &counts
            .iter()
            .map(|&(y, yes, _)| (y, Some(yes as f64)))
            .collect::<Vec<_>>(),
    );
    let no_steps = step_variations(
        &counts
            .iter()
            .map(|&(y, _, no)| (y, Some(no as f64)))
            .collect::<Vec<_>>(),
    );

    let labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    let yes: Vec<u32> = counts.iter().map(|c| c.1).collect();
    let no: Vec<u32> = counts.iter().map(|c| c.2).collect();
    let var_yes: Vec<f64> = yes_steps.iter().map(|s| s.1).collect();
    let var_no: Vec<f64> = no_steps.iter().map(|s| s.1).collect();

    let frame = DataFrame::new(vec![
        Column::new("Ano".into(), labels.clone()),
        Column::new("Sim".into(), yes.clone()),
        Column::new("Não".into(), no.clone()),
        Column::new("Variação Sim (%)".into(), var_yes.clone()),
        Column::new("Variação Não (%)".into(), var_no.clone()),
    ])?;

    let mut output = ViewOutput::new(View::TurningPoints);
    output.details = vec![
        format!("Anos Selecionados: {}", join_labels(&years)),
        format!("Tipo de gráfico: {}", kind),
    ];
    output.tables.push(
        NamedTable::new("ponto_de_virada", "Tabela de Ponto de Virada por Ano", frame).with_index("Ano"),
    );

    output.metrics = vec![
        Metric::new("Total de 'Sim'", yes.iter().sum::<u32>().to_string())
            .with_delta(var_yes.last().map(|v| fmt_pct(*v))),
        Metric::new("Total de 'Não'", no.iter().sum::<u32>().to_string())
            .with_delta(var_no.last().map(|v| fmt_pct(*v))),
    ];

    output.charts.push(Chart::new(
        "grafico_ponto_de_virada",
        "Ponto de Virada por Ano",
        "Ano",
        "Contagem",
        Plot::Categories {
            kind,
            categories: labels.clone(),
            series: vec![Series::from_counts("Sim", &yes), Series::from_counts("Não", &no)],
            stacked: false,
        },
    ));
    output.charts.push(Chart::new(
        "grafico_ponto_de_virada_variacao",
        "Variação Percentual do Ponto de Virada",
        "Ano",
        "Variação Percentual (%)",
        Plot::Categories {
            kind: ChartKind::Line,
            categories: labels,
            series: vec![
                Series::new("Variação Sim (%)", var_yes.into_iter().map(Some).collect()),
                Series::new("Variação Não (%)", var_no.into_iter().map(Some).collect()),
            ],
            stacked: false,
        },
    ));

    Ok(output)
}
