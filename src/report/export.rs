//! File exports: per-table CSV, chart images, JSON report and zip bundles

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::{AnyValue, CsvWriter, SerWriter};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::{debug, info, warn};

use super::chart::write_chart;
use crate::dashboard::{Filters, Metric, NamedTable, View, ViewOutput};
use crate::pipeline::Dataset;

/// Where and what to export for a view
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub dir: PathBuf,
    /// Keep the index column in CSV files
    pub include_index: bool,
    pub json: bool,
    pub chart_images: bool,
}

impl ExportOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            include_index: true,
            json: false,
            chart_images: false,
        }
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub pededash_version: String,
    pub input_file: String,
    pub view: View,
    pub title: String,
    /// Selections in effect, as shown on screen
    pub filters: Vec<String>,
}

/// One derived table as a list of records
#[derive(Debug, Clone, Serialize)]
pub struct TableRecords {
    pub name: String,
    pub title: String,
    pub index: Option<String>,
    pub records: Vec<Map<String, Value>>,
}

/// Complete JSON report of a view
#[derive(Debug, Clone, Serialize)]
pub struct ViewReport {
    pub metadata: ReportMetadata,
    pub metrics: Vec<Metric>,
    pub tables: Vec<TableRecords>,
}

/// JSON value of a table cell
pub fn json_value(value: &AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(*b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Float64(v) => Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null),
        AnyValue::Float32(v) => Number::from_f64(*v as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        AnyValue::Int32(v) => Value::from(*v),
        AnyValue::Int64(v) => Value::from(*v),
        AnyValue::UInt32(v) => Value::from(*v),
        AnyValue::UInt64(v) => Value::from(*v),
        other => Value::String(other.to_string()),
    }
}

/// Convert a table into row records keyed by column name
pub fn table_records(table: &NamedTable) -> Result<TableRecords> {
    let frame = &table.frame;
    let mut records = Vec::with_capacity(frame.height());
    for row in 0..frame.height() {
        let mut record = Map::new();
        for column in frame.get_columns() {
            let value = column
                .get(row)
                .with_context(|| format!("Failed to read row {} of '{}'", row, table.name))?;
            record.insert(column.name().to_string(), json_value(&value));
        }
        records.push(record);
    }
    Ok(TableRecords {
        name: table.name.clone(),
        title: table.title.clone(),
        index: table.index.clone(),
        records,
    })
}

/// Assemble the JSON report of a view
pub fn build_report(output: &ViewOutput, input_file: &Path) -> Result<ViewReport> {
    Ok(ViewReport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            pededash_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.display().to_string(),
            view: output.view,
            title: output.title.clone(),
            filters: output.details.clone(),
        },
        metrics: output.metrics.clone(),
        tables: output
            .tables
            .iter()
            .map(table_records)
            .collect::<Result<Vec<_>>>()?,
    })
}

/// Write one derived table as comma-separated UTF-8 with a header row
pub fn write_table_csv(table: &NamedTable, path: &Path, include_index: bool) -> Result<()> {
    let mut frame = if include_index {
        table.frame.clone()
    } else {
        table.without_index()?
    };
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
    Ok(())
}

/// Export every artifact of a view into `options.dir`, returning the files written
pub fn export_view(
    output: &ViewOutput,
    options: &ExportOptions,
    input_file: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&options.dir)
        .with_context(|| format!("Failed to create directory: {}", options.dir.display()))?;

    let mut written = Vec::new();
    for table in &output.tables {
        let path = options.dir.join(format!("{}.csv", table.name));
        write_table_csv(table, &path, options.include_index)?;
        debug!(path = %path.display(), rows = table.frame.height(), "table exported");
        written.push(path);
    }

    if options.chart_images {
        for chart in &output.charts {
            written.push(write_chart(chart, &options.dir)?);
        }
    }

    if options.json {
        let report = build_report(output, input_file)?;
        let path = options
            .dir
            .join(format!("{}_report.json", output.view.slug()));
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        written.push(path);
    }

    info!(view = output.view.slug(), files = written.len(), "view exported");
    Ok(written)
}

/// Package `files` into a zip archive under `prefix/`, removing the originals
pub fn package_bundle(files: &[(String, PathBuf)], zip_path: &Path) -> Result<()> {
    use ::zip::write::SimpleFileOptions;
    use ::zip::{CompressionMethod, ZipWriter};

    if let Some(parent) = zip_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let zip_file = File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for (prefix, path) in files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?;
        let entry = format!("{}/{}", prefix, filename);
        zip.start_file(entry.as_str(), options)
            .with_context(|| format!("Failed to add {} to zip", entry))?;
        let mut content = Vec::new();
        File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
            .read_to_end(&mut content)?;
        zip.write_all(&content)?;
    }

    zip.finish().context("Failed to finalize zip file")?;

    for (_, path) in files {
        std::fs::remove_file(path).ok();
    }

    Ok(())
}

/// Hidden staging directory used while a bundle is assembled next to `zip_path`
pub fn bundle_staging_dir(zip_path: &Path) -> PathBuf {
    let stem = zip_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pededash_bundle");
    zip_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!(".{}_staging", stem))
}

/// Run every view with default filters and package all artifacts into `zip_path`.
///
/// `on_view` is called after each view is staged. The staging directory is
/// removed whether or not packaging succeeds. Returns the number of files packaged.
pub fn export_bundle(
    dataset: &Dataset,
    zip_path: &Path,
    chart_images: bool,
    include_index: bool,
    mut on_view: impl FnMut(View),
) -> Result<usize> {
    let staging = bundle_staging_dir(zip_path);
    let result = stage_bundle(dataset, &staging, chart_images, include_index, &mut on_view)
        .and_then(|files| package_bundle(&files, zip_path).map(|()| files.len()));

    if staging.exists() {
        if let Err(err) = std::fs::remove_dir_all(&staging) {
            warn!(path = %staging.display(), error = %err, "staging directory left behind");
        }
    }
    result
}

fn stage_bundle(
    dataset: &Dataset,
    staging: &Path,
    chart_images: bool,
    include_index: bool,
    on_view: &mut impl FnMut(View),
) -> Result<Vec<(String, PathBuf)>> {
    let filters = Filters::default();
    let mut files = Vec::new();
    for view in View::ALL {
        let output = view.run(dataset, &filters)?;
        let options = ExportOptions {
            dir: staging.join(view.slug()),
            include_index,
            json: true,
            chart_images,
        };
        for file in export_view(&output, &options, dataset.path())? {
            files.push((view.slug().to_string(), file));
        }
        on_view(view);
    }
    debug!(files = files.len(), "bundle staged");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use tempfile::TempDir;

    #[test]
    fn test_json_value_maps_nan_to_null() {
        assert_eq!(json_value(&AnyValue::Float64(f64::NAN)), Value::Null);
        assert_eq!(json_value(&AnyValue::Float64(1.5)), serde_json::json!(1.5));
        assert_eq!(json_value(&AnyValue::String("Sim")), serde_json::json!("Sim"));
        assert_eq!(json_value(&AnyValue::UInt32(7)), serde_json::json!(7));
    }

    #[test]
    fn test_table_records() {
        let frame = df! {
            "Ano" => ["2020", "2021"],
            "Sim" => [3u32, 4],
        }
        .unwrap();
        let table = NamedTable::new("t", "T", frame).with_index("Ano");
        let records = table_records(&table).unwrap();
        assert_eq!(records.records.len(), 2);
        assert_eq!(records.records[1]["Ano"], serde_json::json!("2021"));
        assert_eq!(records.records[1]["Sim"], serde_json::json!(4));
        assert_eq!(records.index.as_deref(), Some("Ano"));
    }

    #[test]
    fn test_package_bundle_prefixes_entries() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("frequencia_pedra.csv");
        std::fs::write(&csv, "Ano,Quartzo\n2020,2\n").unwrap();
        let zip_path = dir.path().join("out").join("bundle.zip");

        package_bundle(&[("pedra-frequency".to_string(), csv.clone())], &zip_path).unwrap();

        let mut archive = ::zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut entry = archive.by_name("pedra-frequency/frequencia_pedra.csv").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "Ano,Quartzo\n2020,2\n");
        assert!(!csv.exists());
    }
}
