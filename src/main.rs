//! Pededash: PEDE educational outcomes dashboard CLI
//!
//! Loads the PEDE dataset once, runs one of the nine analytic views (or all
//! of them for a bundle) and prints the derived tables, optionally exporting
//! CSV, JSON and chart images.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing::error;

use pededash::cli::{confirm_export, select_view, Cli, Commands, DEFAULT_EXPORT_DIR};
use pededash::dashboard::{Filters, View, ViewOutput};
use pededash::error::DatasetError;
use pededash::pipeline::Dataset;
use pededash::report::{display_view, export_bundle, export_view, DatasetSummary, ExportOptions};
use pededash::utils::init_logging;
use pededash::utils::progress::{create_progress_bar, create_spinner, finish_with_success};
use pededash::utils::styling::{
    print_banner, print_completion, print_config, print_count, print_info, print_step_header,
    print_success,
};

/// Exit status for a missing, unreadable or malformed input file
const EXIT_CONFIG_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(dataset_err) = err.chain().find_map(|e| e.downcast_ref::<DatasetError>()) {
                error!(path = %dataset_err.path().display(), "dataset could not be used");
                eprintln!(
                    "{} {}",
                    style("Erro de configuração:").red().bold(),
                    dataset_err
                );
                ExitCode::from(EXIT_CONFIG_ERROR)
            } else {
                eprintln!("{} {:#}", style("Erro:").red().bold(), err);
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    print_banner(env!("CARGO_PKG_VERSION"));

    // Resolve what to run before touching the dataset
    let interactive = cli.command.is_none() && !cli.no_confirm;
    let picked = if interactive {
        Some(select_view()?)
    } else {
        None
    };

    // Step 1: Load dataset
    print_step_header(1, "Carregar conjunto de dados");
    let dataset = load(&cli.input)?;

    match (&cli.command, picked) {
        (Some(Commands::Summary), _) | (None, None) => {
            print_step_header(2, "Resumo");
            DatasetSummary::from_dataset(&dataset)?.display();
        }
        (
            Some(Commands::Bundle {
                output,
                chart_image,
                no_index,
            }),
            _,
        ) => {
            print_step_header(2, "Executar todas as análises");
            run_bundle(&dataset, output, *chart_image, !*no_index)?;
        }
        (Some(command), _) => {
            if let Some(view) = command.view() {
                let options = command.export().and_then(|e| e.options());
                run_view(&dataset, view, &command.filters(), options.as_ref())?;
            }
        }
        (None, Some(view)) => {
            let output = run_view(&dataset, view, &Filters::default(), None)?;
            if confirm_export(DEFAULT_EXPORT_DIR)? {
                let options = ExportOptions::new(DEFAULT_EXPORT_DIR);
                export(&dataset, &output, &options)?;
            }
        }
    }

    print_completion();
    Ok(())
}

fn load(input: &Path) -> Result<Dataset> {
    let spinner = create_spinner("Carregando conjunto de dados...");
    let dataset = match Dataset::load(input) {
        Ok(dataset) => dataset,
        Err(err) => {
            spinner.finish_and_clear();
            return Err(err.into());
        }
    };
    finish_with_success(&spinner, "Conjunto de dados carregado");

    print_count("linhas carregadas", dataset.raw().height(), None);
    print_count(
        "linhas completas mantidas",
        dataset.complete().height(),
        Some("(linhas com algum campo ausente descartadas)"),
    );
    print_info(&format!("Memória estimada: {:.2} MB", dataset.estimated_mb()));
    Ok(dataset)
}

fn run_view(
    dataset: &Dataset,
    view: View,
    filters: &Filters,
    options: Option<&ExportOptions>,
) -> Result<ViewOutput> {
    print_config(dataset.path(), view.title(), options.map(|o| o.dir.as_path()));

    print_step_header(2, view.title());
    let spinner = create_spinner("Calculando...");
    let output = view.run(dataset, filters);
    spinner.finish_and_clear();
    let output = output?;
    display_view(&output);

    if let Some(options) = options {
        print_step_header(3, "Exportar");
        export(dataset, &output, options)?;
    }
    Ok(output)
}

fn export(dataset: &Dataset, output: &ViewOutput, options: &ExportOptions) -> Result<()> {
    let files = export_view(output, options, dataset.path())?;
    for file in &files {
        print_info(&file.display().to_string());
    }
    print_success(&format!(
        "{} arquivo(s) exportado(s) em {}",
        files.len(),
        options.dir.display()
    ));
    Ok(())
}

fn run_bundle(dataset: &Dataset, zip_path: &Path, chart_images: bool, include_index: bool) -> Result<()> {
    let pb = create_progress_bar(View::ALL.len() as u64, "Análises");
    let packaged = export_bundle(dataset, zip_path, chart_images, include_index, |view| {
        pb.set_message(view.slug());
        pb.inc(1);
    });
    if packaged.is_err() {
        pb.abandon();
    }
    let packaged = packaged?;
    finish_with_success(&pb, "Todas as análises concluídas");

    print_success(&format!(
        "{} arquivo(s) empacotado(s) em {}",
        packaged,
        zip_path.display()
    ));
    Ok(())
}
