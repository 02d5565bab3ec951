//! Dataset summary: what was loaded and what the cleaning step kept

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{analyze_missing_values, Dataset};

/// Columns listed in the missing-value breakdown
pub const TOP_MISSING: usize = 10;

/// Summary of the loaded dataset
#[derive(Debug, Default)]
pub struct DatasetSummary {
    pub input_file: String,
    pub rows: usize,
    pub complete_rows: usize,
    pub columns: usize,
    pub memory_mb: f64,
    /// Columns with missing values, highest ratio first
    pub missing: Vec<(String, f64)>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let missing = analyze_missing_values(dataset.raw())?
            .into_iter()
            .filter(|(_, ratio)| *ratio > 0.0)
            .collect();
        Ok(Self {
            input_file: dataset.path().display().to_string(),
            rows: dataset.raw().height(),
            complete_rows: dataset.complete().height(),
            columns: dataset.raw().width(),
            memory_mb: dataset.estimated_mb(),
            missing,
        })
    }

    /// Rows removed by complete-case cleaning
    pub fn dropped_rows(&self) -> usize {
        self.rows - self.complete_rows
    }

    pub fn retained_pct(&self) -> f64 {
        if self.rows > 0 {
            self.complete_rows as f64 / self.rows as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn display(&self) {
        println!();
        println!("    {}", style("RESUMO DO CONJUNTO DE DADOS").white().bold());
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Métrica").add_attribute(Attribute::Bold),
            Cell::new("Valor").add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![Cell::new("Arquivo"), Cell::new(&self.input_file)]);
        table.add_row(vec![Cell::new("Linhas carregadas"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("Colunas"), Cell::new(self.columns)]);
        table.add_row(vec![
            Cell::new("Linhas completas"),
            Cell::new(self.complete_rows)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("Linhas descartadas"),
            Cell::new(self.dropped_rows()).fg(if self.dropped_rows() == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        let pct = self.retained_pct();
        let color = if pct > 70.0 {
            Color::Green
        } else if pct > 30.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new("Retenção"),
            Cell::new(format!("{:.1}%", pct))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("Memória estimada"),
            Cell::new(format!("{:.1} MB", self.memory_mb)),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.missing.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("COLUNAS COM VALORES AUSENTES").white().bold(),
                style(format!("({})", self.missing.len())).dim()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for (name, ratio) in self.missing.iter().take(TOP_MISSING) {
                println!(
                    "      {} {:<24} {}",
                    style("•").dim(),
                    name,
                    style(format!("{:.1}%", ratio * 100.0)).yellow()
                );
            }
            if self.missing.len() > TOP_MISSING {
                println!(
                    "      {}",
                    style(format!("... e mais {}", self.missing.len() - TOP_MISSING)).dim()
                );
            }
        }
    }
}
