//! Number of students per rock tier and year

use anyhow::Result;
use polars::prelude::*;

use super::chart::{Chart, ChartKind, Plot, Series};
use super::filters::{join_labels, Filters};
use super::output::{Metric, NamedTable, ViewOutput};
use super::View;
use crate::pipeline::{text_column, tier_counts, Dataset, Pedra, PEDRA};

pub(super) fn build(dataset: &Dataset, filters: &Filters) -> Result<ViewOutput> {
    let df = dataset.complete();
    let years = filters.selected_years();
    let kind = filters.chart_or(ChartKind::Bar, &ChartKind::SERIES);

    let mut counts: Vec<[u32; 4]> = Vec::with_capacity(years.len());
    for year in &years {
        counts.push(tier_counts(&text_column(df, &year.column(PEDRA))?));
    }

    let labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    let mut columns = vec![Column::new("Ano".into(), labels.clone())];
    for pedra in Pedra::CANONICAL {
        columns.push(Column::new(
            pedra.label().into(),
            counts.iter().map(|c| c[pedra.index()]).collect::<Vec<_>>(),
        ));
    }
    let frame = DataFrame::new(columns)?;

    let mut output = ViewOutput::new(View::PedraFrequency);
    output.details = vec![
        format!("Anos Selecionados: {}", join_labels(&years)),
        format!("Tipo de gráfico: {}", kind),
    ];
    output.tables.push(
        NamedTable::new(
            "frequencia_pedra",
            "Tabela de Frequência de Alunos por Pedras",
            frame,
        )
        .with_index("Ano"),
    );

    output.metrics = Pedra::CANONICAL
        .iter()
        .map(|p| {
            let total: u32 = counts.iter().map(|c| c[p.index()]).sum();
            Metric::new(format!("Total {}", p), total.to_string())
        })
        .collect();

    output.charts.push(Chart::new(
        "grafico_frequencia_pedra",
        "Distribuição de Alunos por Categoria de Pedra (2020-2022)",
        "Ano",
        "Frequência",
        Plot::Categories {
            kind,
            categories: labels,
            series: Pedra::CANONICAL
                .iter()
                .map(|p| {
                    let per_year: Vec<u32> = counts.iter().map(|c| c[p.index()]).collect();
                    Series::from_counts(p.label(), &per_year)
                })
                .collect(),
            stacked: false,
        },
    ));

    Ok(output)
}
