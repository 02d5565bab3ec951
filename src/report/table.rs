//! Terminal rendering of a view's tables and metrics

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use polars::prelude::*;

use crate::dashboard::{Metric, NamedTable, ViewOutput};

/// Rows printed per table; exports always carry the full table
pub const MAX_DISPLAY_ROWS: usize = 20;

/// Display text of a single cell
pub fn format_cell(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => "-".to_string(),
        AnyValue::Float64(v) => format!("{:.2}", v),
        AnyValue::Float32(v) => format!("{:.2}", v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Build a comfy-table for a derived table, index column first
pub fn build_table(table: &NamedTable, max_rows: usize) -> Table {
    let frame = &table.frame;
    let mut columns: Vec<&Column> = frame.get_columns().iter().collect();
    if let Some(index) = &table.index {
        if let Some(pos) = columns.iter().position(|c| c.name().as_str() == index) {
            let index_column = columns.remove(pos);
            columns.insert(0, index_column);
        }
    }

    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);
    out.set_header(
        columns
            .iter()
            .map(|c| Cell::new(c.name().as_str()).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for row in 0..frame.height().min(max_rows) {
        out.add_row(
            columns
                .iter()
                .enumerate()
                .map(|(pos, c)| {
                    let text = c
                        .get(row)
                        .map(|v| format_cell(&v))
                        .unwrap_or_else(|_| "-".to_string());
                    let cell = Cell::new(text);
                    if pos == 0 && table.index.is_some() {
                        cell.fg(Color::Cyan)
                    } else {
                        cell
                    }
                })
                .collect::<Vec<_>>(),
        );
    }
    out
}

/// Build the metrics table; deltas are colored by sign
pub fn build_metrics_table(metrics: &[Metric]) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);
    out.set_header(vec![
        Cell::new("Métrica").add_attribute(Attribute::Bold),
        Cell::new("Valor").add_attribute(Attribute::Bold),
        Cell::new("Variação").add_attribute(Attribute::Bold),
    ]);

    for metric in metrics {
        let delta = match &metric.delta {
            Some(d) if d.starts_with('-') => Cell::new(d).fg(Color::Red),
            Some(d) => Cell::new(d).fg(Color::Green),
            None => Cell::new(""),
        };
        out.add_row(vec![
            Cell::new(&metric.label),
            Cell::new(&metric.value).add_attribute(Attribute::Bold),
            delta,
        ]);
    }
    out
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Print a whole view result to stdout
pub fn display_view(output: &ViewOutput) {
    println!();
    println!("    {}", style(&output.title).white().bold());
    println!("    {}", style("─".repeat(60)).dim());
    for detail in &output.details {
        println!("    {} {}", style("•").dim(), detail);
    }

    for table in &output.tables {
        println!();
        println!("    {}", style(&table.title).cyan().bold());
        print_indented(&build_table(table, MAX_DISPLAY_ROWS));
        let height = table.frame.height();
        if height > MAX_DISPLAY_ROWS {
            println!(
                "    {}",
                style(format!("... {} de {} linhas exibidas", MAX_DISPLAY_ROWS, height)).dim()
            );
        }
    }

    if !output.metrics.is_empty() {
        println!();
        println!("    {}", style("Métricas").cyan().bold());
        print_indented(&build_metrics_table(&output.metrics));
    }
}
