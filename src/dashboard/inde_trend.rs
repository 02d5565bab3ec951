//! Per-student INDE trend categorisation and 2020 -> 2022 variation

use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

use super::chart::{Chart, ChartKind, Plot, Series};
use super::filters::Filters;
use super::output::{fmt_opt, Metric, NamedTable, ViewOutput};
use super::View;
use crate::pipeline::{
    classify_trend, count_trends, mean, numeric_column, percentage_variation, text_column, Dataset,
    Indicator, Trend, Variation, Year,
};

/// Optional student name column carried into the per-student table
const NAME_COLUMN: &str = "NOME";

/// Trend outcome for one student row
#[derive(Debug, Clone, PartialEq)]
pub struct StudentTrend {
    pub inde: [Option<f64>; 3],
    pub trend: Trend,
    /// 2020 -> 2022 percentage variation
    pub variation: Option<Variation>,
}

/// Classify every row of `df` by its INDE across the three years
pub fn student_trends(df: &DataFrame) -> Result<Vec<StudentTrend>> {
    let [a, b, c] = Year::ALL.map(|y| Indicator::Inde.column(y));
    let (a, b, c) = (
        numeric_column(df, &a)?,
        numeric_column(df, &b)?,
        numeric_column(df, &c)?,
    );

    Ok(a.into_iter()
        .zip(b)
        .zip(c)
        .map(|((a, b), c)| StudentTrend {
            inde: [a, b, c],
            trend: classify_trend(a, b, c),
            variation: percentage_variation(a, c),
        })
        .collect())
}

pub(super) fn build(dataset: &Dataset, filters: &Filters) -> Result<ViewOutput> {
    let df = dataset.complete();
    let kind = filters.chart_or(ChartKind::Bar, &ChartKind::SERIES);
    let students = student_trends(df)?;
    let trends: Vec<Trend> = students.iter().map(|s| s.trend).collect();
    let counts = count_trends(&trends);
    let total: u32 = counts.iter().sum();
    debug!(students = students.len(), "trends classified");

    let labels: Vec<String> = Trend::ALL.iter().map(|t| t.label().to_string()).collect();
    let summary = DataFrame::new(vec![
        Column::new("Tendência".into(), labels.clone()),
        Column::new("Contagem".into(), counts.to_vec()),
    ])?;

    let mut columns = Vec::new();
    if df.column(NAME_COLUMN).is_ok() {
        columns.push(Column::new(NAME_COLUMN.into(), text_column(df, NAME_COLUMN)?));
    }
    for (i, year) in Year::ALL.iter().enumerate() {
        let values: Vec<Option<f64>> = students.iter().map(|s| s.inde[i]).collect();
        columns.push(Column::new(Indicator::Inde.column(*year).into(), values));
    }
    columns.push(Column::new(
        "INDE_TENDENCIA".into(),
        trends.iter().map(|t| t.label()).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "INDE_VARIACAO".into(),
        students
            .iter()
            .map(|s| s.variation.map(variation_cell))
            .collect::<Vec<Option<String>>>(),
    ));
    let per_student = DataFrame::new(columns)?;

    let finite: Vec<Option<f64>> = students
        .iter()
        .map(|s| s.variation.and_then(|v| v.as_percent()))
        .collect();
    let infinite = students
        .iter()
        .filter(|s| s.variation.map(|v| v.is_infinite()).unwrap_or(false))
        .count();

    let mut output = ViewOutput::new(View::IndeTrend);
    output.details = vec![format!("Tipo de gráfico: {}", kind)];
    output.tables.push(
        NamedTable::new("categorizacao_inde", "Tabela de Categorização INDE", summary)
            .with_index("Tendência"),
    );
    output.tables.push(NamedTable::new(
        "categorizacao_inde_alunos",
        "Tendência e Variação por Aluno",
        per_student,
    ));

    let share = |n: u32| {
        if total == 0 {
            "0.0% do total".to_string()
        } else {
            format!("{:.1}% do total", n as f64 / total as f64 * 100.0)
        }
    };
    let increase = counts[Trend::Increase.index()];
    let decrease = counts[Trend::Decrease.index()];
    output.metrics = vec![
        Metric::new("Aumento", increase.to_string()).with_delta(Some(share(increase))),
        Metric::new("Queda", decrease.to_string()).with_delta(Some(share(decrease))),
        Metric::new(
            "Variação média 2020-2022 (%)",
            fmt_opt(mean(&finite)),
        ),
        Metric::new("Aumento Infinito", infinite.to_string()),
    ];

    output.charts.push(Chart::new(
        "grafico_categorizacao_inde",
        "Categorização INDE",
        "Tendência",
        "Contagem",
        Plot::Categories {
            kind,
            categories: labels,
            series: vec![Series::from_counts("Contagem", &counts)],
            stacked: false,
        },
    ));

    Ok(output)
}

/// Table cell for a variation: the plain number, or the infinite label
fn variation_cell(variation: Variation) -> String {
    match variation {
        Variation::Percent(p) => p.to_string(),
        Variation::InfiniteIncrease => variation.to_string(),
    }
}
