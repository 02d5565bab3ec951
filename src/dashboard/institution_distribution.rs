//! Institution x rock tier counts for 2020 and 2021

use std::collections::BTreeMap;

use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

use super::chart::{Chart, ChartKind, Plot, Series};
use super::filters::{join_labels, Filters};
use super::output::{fmt_pct, Metric, NamedTable, ViewOutput};
use super::View;
use crate::pipeline::{
    percentages, text_column, tier_crosstab, Dataset, Pedra, Year, INSTITUTION, NULL_MARKER, PEDRA,
};

/// Years that carry an institution column
const YEARS: [Year; 2] = [Year::Y2020, Year::Y2021];

/// Keep the selected institutions; `None` keeps all of them
fn select(
    table: BTreeMap<String, [u32; 4]>,
    selection: Option<&Vec<String>>,
) -> BTreeMap<String, [u32; 4]> {
    match selection {
        None => table,
        Some(names) => table
            .into_iter()
            .filter(|(name, _)| names.iter().any(|n| n.trim() == name.as_str()))
            .collect(),
    }
}

fn crosstab_frame(table: &BTreeMap<String, [u32; 4]>) -> PolarsResult<DataFrame> {
    let mut columns = vec![Column::new(
        "Instituição".into(),
        table.keys().cloned().collect::<Vec<_>>(),
    )];
    for pedra in Pedra::CANONICAL {
        columns.push(Column::new(
            pedra.label().into(),
            table.values().map(|c| c[pedra.index()]).collect::<Vec<_>>(),
        ));
    }
    DataFrame::new(columns)
}

pub(super) fn build(dataset: &Dataset, filters: &Filters) -> Result<ViewOutput> {
    let df = dataset.complete();
    let kind = filters.chart_or(ChartKind::Bar, &ChartKind::SERIES);

    // Rows whose 2021 tier is the spreadsheet null marker are left out of both years
    let tier_2021 = text_column(df, &Year::Y2021.column(PEDRA))?;
    let keep: Vec<bool> = tier_2021
        .iter()
        .map(|t| !t.as_deref().unwrap_or("").contains(NULL_MARKER))
        .collect();
    debug!(
        excluded = keep.iter().filter(|k| !**k).count(),
        "rows with null tier marker excluded"
    );

    let mut output = ViewOutput::new(View::InstitutionDistribution);

    for year in YEARS {
        let masked = |values: Vec<Option<String>>| -> Vec<Option<String>> {
            values
                .into_iter()
                .zip(keep.iter())
                .map(|(v, k)| if *k { v } else { None })
                .collect()
        };
        let institutions = masked(text_column(df, &year.column(INSTITUTION))?);
        let tiers = masked(text_column(df, &year.column(PEDRA))?);

        let selection = match year {
            Year::Y2020 => filters.institutions_2020.as_ref(),
            _ => filters.institutions_2021.as_ref(),
        };
        let table = select(tier_crosstab(&institutions, &tiers), selection);
        let names: Vec<String> = table.keys().cloned().collect();
        output.details.push(format!(
            "Instituições Selecionadas para {}: {}",
            year,
            join_labels(&names)
        ));

        let mut totals = [0u32; 4];
        for counts in table.values() {
            for (total, c) in totals.iter_mut().zip(counts.iter()) {
                *total += c;
            }
        }
        let shares = percentages(&totals);
        for pedra in Pedra::CANONICAL {
            output.metrics.push(Metric::new(
                format!("{} {}", pedra, year),
                fmt_pct(shares[pedra.index()]),
            ));
        }

        output.tables.push(
            NamedTable::new(
                &format!("distribuicao_pedra_{}", year),
                &format!("Distribuição de Pedra por Instituição em {}", year),
                crosstab_frame(&table)?,
            )
            .with_index("Instituição"),
        );

        output.charts.push(Chart::new(
            &format!("distribuicao_pedra_{}_grafico", year),
            &format!("Distribuição de Pedra por Instituição em {}", year),
            "Instituição de Ensino",
            "Número de Alunos",
            Plot::Categories {
                kind,
                categories: names,
                series: Pedra::CANONICAL
                    .iter()
                    .map(|p| {
                        let counts: Vec<u32> = table.values().map(|c| c[p.index()]).collect();
                        Series::from_counts(p.label(), &counts)
                    })
                    .collect(),
                stacked: kind == ChartKind::Bar,
            },
        ));
    }
    output.details.push(format!("Tipo de gráfico: {}", kind));

    Ok(output)
}
