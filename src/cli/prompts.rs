//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

use crate::dashboard::View;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Let the user pick one of the nine views
pub fn select_view() -> Result<View> {
    let items: Vec<&str> = View::ALL.iter().map(|v| v.title()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Selecione a análise")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(View::ALL[selection])
}

/// Ask whether the view's tables should be exported to `dir`
pub fn confirm_export(dir: &str) -> Result<bool> {
    confirm_step(&format!("Exportar as tabelas em CSV para '{}'?", dir))
}
