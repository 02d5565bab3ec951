//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ╔═╗╔═╗╔╦╗╔═╗  ╔╦╗╔═╗╔═╗╦ ╦
    ╠═╝║╣  ║║║╣    ║║╠═╣╚═╗╠═╣
    ╩  ╚═╝═╩╝╚═╝  ═╩╝╩ ╩╚═╝╩ ╩
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        CHART,
        style("Indicadores educacionais PEDE 2020-2022").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the input card shown before a view runs
pub fn print_config(input: &Path, view: &str, export_dir: Option<&Path>) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!("    │ {:<53}│", style("Configuração").cyan().bold());
    println!("    ├{}┤", line);
    println!("    │  {}Entrada:  {:<40}│", FOLDER, truncate_path(input, 38));
    println!("    │  {}Análise:  {:<40}│", CHART, truncate_string(view, 38));
    if let Some(dir) = export_dir {
        println!("    │  {}Exportar: {:<40}│", SAVE, truncate_path(dir, 38));
    }
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("ETAPA {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {}{}", INFO, message);
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!("    {}{}", ROCKET, style("Análise concluída!").green().bold());
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_keeps_the_tail() {
        assert_eq!(truncate_string("curto", 10), "curto");
        assert_eq!(truncate_string("dataset/PEDE.csv", 10), "...EDE.csv");
        // multi-byte characters are never split
        assert_eq!(truncate_string("ááááááá", 5), "...áá");
    }
}
