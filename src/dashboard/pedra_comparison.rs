//! INDE means grouped by the 2020 rock tier

use anyhow::Result;
use polars::prelude::*;

use super::chart::{Chart, ChartKind, Plot, Series};
use super::filters::{join_labels, Filters};
use super::output::{fmt_opt, Metric, NamedTable, ViewOutput};
use super::View;
use crate::pipeline::{
    grouped_means, numeric_column, text_column, Dataset, Indicator, Pedra, Year, PEDRA,
};

pub(super) fn build(dataset: &Dataset, filters: &Filters) -> Result<ViewOutput> {
    let df = dataset.complete();
    let selected = filters.selected_tiers();
    let kind = filters.chart_or(ChartKind::Bar, &ChartKind::SERIES);

    let mut tier_columns = Vec::with_capacity(3);
    for year in Year::ALL {
        let tiers: Vec<Option<Pedra>> = text_column(df, &year.column(PEDRA))?
            .into_iter()
            .map(|v| v.and_then(|s| Pedra::from_label(&s)))
            .collect();
        tier_columns.push(tiers);
    }

    // Only students with a recognised tier in all three years take part
    let tiers_2020: Vec<Option<Pedra>> = (0..df.height())
        .map(|i| {
            if tier_columns.iter().all(|c| c[i].is_some()) {
                tier_columns[0][i]
            } else {
                None
            }
        })
        .collect();

    let mut columns = Vec::with_capacity(3);
    for year in Year::ALL {
        columns.push((year, numeric_column(df, &Indicator::Inde.column(year))?));
    }

    let rows = grouped_means(&tiers_2020, &columns, &selected);

    let mut frame_columns = vec![Column::new(
        "PEDRA".into(),
        rows.iter().map(|r| r.tier.label()).collect::<Vec<_>>(),
    )];
    for year in Year::ALL {
        frame_columns.push(Column::new(
            Indicator::Inde.column(year).into(),
            rows.iter().map(|r| r.mean_for(year)).collect::<Vec<_>>(),
        ));
    }
    frame_columns.push(Column::new(
        "INDE_Media_2020_2022".into(),
        rows.iter().map(|r| r.overall).collect::<Vec<_>>(),
    ));
    let frame = DataFrame::new(frame_columns)?;

    let mut output = ViewOutput::new(View::PedraComparison);
    output.details = vec![
        format!("Categorias de Pedra Selecionadas: {}", join_labels(&selected)),
        format!("Tipo de gráfico: {}", kind),
    ];
    output.tables.push(
        NamedTable::new(
            "comparacao_pedra",
            "Tabela Comparativa do INDE por Categoria de Pedra",
            frame,
        )
        .with_index("PEDRA"),
    );

    output.metrics = rows
        .iter()
        .map(|r| Metric::new(format!("INDE Médio {}", r.tier), fmt_opt(r.overall)))
        .collect();

    output.charts.push(Chart::new(
        "comparacao_pedra_grafico",
        "Comparação do INDE por Categoria de Pedra (2020, 2021, 2022)",
        "Categoria de Pedra",
        "INDE Médio",
        Plot::Categories {
            kind,
            categories: Pedra::CANONICAL.iter().map(|p| p.to_string()).collect(),
            series: Year::ALL
                .iter()
                .map(|&year| {
                    Series::new(
                        format!("INDE {}", year),
                        rows.iter().map(|r| r.mean_for(year)).collect(),
                    )
                })
                .collect(),
            stacked: false,
        },
    ));

    Ok(output)
}
