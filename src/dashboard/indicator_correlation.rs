//! Correlation heatmap over the yearly indicators

use anyhow::Result;
use polars::prelude::*;

use super::chart::{Chart, Plot};
use super::filters::Filters;
use super::output::{Metric, NamedTable, ViewOutput};
use super::View;
use crate::pipeline::{correlation_matrix, numeric_column, Dataset, Indicator, Year};

/// Strongest off-diagonal pairs reported as metrics
const TOP_PAIRS: usize = 3;

pub(super) fn build(dataset: &Dataset, filters: &Filters) -> Result<ViewOutput> {
    let df = dataset.complete();

    let mut columns = Vec::with_capacity(Indicator::CORRELATED.len() * Year::ALL.len());
    for indicator in Indicator::CORRELATED {
        for year in Year::ALL {
            let name = indicator.column(year);
            let values = numeric_column(df, &name)?;
            columns.push((name, values));
        }
    }

    let matrix = correlation_matrix(&columns);

    let mut frame_columns = vec![Column::new("Indicador".into(), matrix.columns.clone())];
    for (j, name) in matrix.columns.iter().enumerate() {
        frame_columns.push(Column::new(
            name.as_str().into(),
            (0..matrix.len()).map(|i| matrix.get(i, j)).collect::<Vec<_>>(),
        ));
    }
    let frame = DataFrame::new(frame_columns)?;

    let mut output = ViewOutput::new(View::IndicatorCorrelation);
    output.details = vec![
        format!(
            "Indicadores Selecionados para o Heatmap de Correlação: {}",
            matrix.columns.join(", ")
        ),
        format!("Escala de Cores: {}", filters.color_scale.label()),
    ];
    output.tables.push(
        NamedTable::new(
            "matriz_correlacao_indicadores",
            "Matriz de Correlação",
            frame,
        )
        .with_index("Indicador"),
    );

    output.metrics = matrix
        .pairs_above(0.0)
        .into_iter()
        .take(TOP_PAIRS)
        .map(|pair| {
            Metric::new(
                format!("{} x {}", pair.feature1, pair.feature2),
                format!("{:.2}", pair.correlation),
            )
        })
        .collect();

    output.charts.push(Chart::new(
        "heatmap_correlacao_indicadores",
        "Heatmap de Correlação entre Indicadores (2020 a 2022)",
        "",
        "",
        Plot::Heatmap {
            labels: matrix.columns.clone(),
            values: matrix.values.clone(),
            scale: filters.color_scale,
        },
    ));

    Ok(output)
}
