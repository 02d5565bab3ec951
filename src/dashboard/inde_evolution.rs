//! Mean INDE per year for students with and without a turning point

use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

use super::chart::{Chart, ChartKind, Plot, Series};
use super::filters::{join_labels, Filters};
use super::output::{fmt_pct, Metric, NamedTable, ViewOutput};
use super::View;
use crate::pipeline::{
    mean, numeric_column, step_variations, text_column, Dataset, Indicator, TurningPoint, Year,
    TURNING_POINT,
};

/// Split of the rows by their turning point history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cohort {
    /// `Sim` in at least one year
    WithTurningPoint,
    /// `Não` in every year
    WithoutTurningPoint,
    Neither,
}

fn cohort(flags: [Option<TurningPoint>; 3]) -> Cohort {
    if flags.contains(&Some(TurningPoint::Yes)) {
        Cohort::WithTurningPoint
    } else if flags.iter().all(|f| *f == Some(TurningPoint::No)) {
        Cohort::WithoutTurningPoint
    } else {
        Cohort::Neither
    }
}

pub(super) fn build(dataset: &Dataset, filters: &Filters) -> Result<ViewOutput> {
    let df = dataset.complete();
    let years = filters.selected_years();
    let kind = filters.chart_or(ChartKind::Bar, &ChartKind::SERIES);

    let mut flags = Vec::with_capacity(3);
    for year in Year::ALL {
        let column: Vec<Option<TurningPoint>> = text_column(df, &year.column(TURNING_POINT))?
            .into_iter()
            .map(|v| v.and_then(|s| TurningPoint::from_label(&s)))
            .collect();
        flags.push(column);
    }
    let cohorts: Vec<Cohort> = (0..df.height())
        .map(|i| cohort([flags[0][i], flags[1][i], flags[2][i]]))
        .collect();
    debug!(
        with = cohorts.iter().filter(|c| **c == Cohort::WithTurningPoint).count(),
        without = cohorts.iter().filter(|c| **c == Cohort::WithoutTurningPoint).count(),
        "turning point cohorts"
    );

    let mut with_means: Vec<(Year, Option<f64>)> = Vec::new();
    let mut without_means: Vec<(Year, Option<f64>)> = Vec::new();
    for &year in &years {
        let inde = numeric_column(df, &Indicator::Inde.column(year))?;
        let pick = |target: Cohort| -> Vec<Option<f64>> {
            inde.iter()
                .zip(cohorts.iter())
                .filter(|(_, c)| **c == target)
                .map(|(v, _)| *v)
                .collect()
        };
        with_means.push((year, mean(&pick(Cohort::WithTurningPoint))));
        without_means.push((year, mean(&pick(Cohort::WithoutTurningPoint))));
    }

    let with_steps: Vec<f64> = step_variations(&with_means).into_iter().map(|s| s.1).collect();
    let without_steps: Vec<f64> = step_variations(&without_means).into_iter().map(|s| s.1).collect();
    let with_values: Vec<Option<f64>> = with_means.iter().map(|m| m.1).collect();
    let without_values: Vec<Option<f64>> = without_means.iter().map(|m| m.1).collect();
    let labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();

    let frame = DataFrame::new(vec![
        Column::new("Ano".into(), labels.clone()),
        Column::new("INDE Médio Com Ponto de Virada".into(), with_values.clone()),
        Column::new("INDE Médio Sem Ponto de Virada".into(), without_values.clone()),
        Column::new("Variação Com Ponto de Virada (%)".into(), with_steps.clone()),
        Column::new("Variação Sem Ponto de Virada (%)".into(), without_steps.clone()),
    ])?;

    let mut output = ViewOutput::new(View::IndeEvolution);
    output.details = vec![
        format!("Anos Selecionados: {}", join_labels(&years)),
        format!("Tipo de gráfico: {}", kind),
    ];
    output.tables.push(
        NamedTable::new("evolucao_inde", "Tabela de Evolução do INDE por Ano", frame).with_index("Ano"),
    );

    let total = |values: &[Option<f64>]| format!("{:.2}", values.iter().flatten().sum::<f64>());
    output.metrics = vec![
        Metric::new("INDE Médio Com Ponto de Virada", total(&with_values))
            .with_delta(with_steps.last().map(|v| fmt_pct(*v))),
        Metric::new("INDE Médio Sem Ponto de Virada", total(&without_values))
            .with_delta(without_steps.last().map(|v| fmt_pct(*v))),
    ];

    output.charts.push(Chart::new(
        "grafico_evolucao_inde",
        "Evolução do INDE ao Longo dos Anos",
        "Ano",
        "INDE Médio",
        Plot::Categories {
            kind,
            categories: labels,
            series: vec![
                Series::new("Com Ponto de Virada", with_values),
                Series::new("Sem Ponto de Virada", without_values),
            ],
            stacked: false,
        },
    ));

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cohort_split() {
        use TurningPoint::{No, Yes};
        assert_eq!(cohort([Some(No), Some(Yes), Some(No)]), Cohort::WithTurningPoint);
        assert_eq!(cohort([Some(No), Some(No), Some(No)]), Cohort::WithoutTurningPoint);
        assert_eq!(cohort([Some(No), None, Some(No)]), Cohort::Neither);
    }
}
