//! Subcommands and the file handling they share.

pub mod classify;
pub mod config;
pub mod extract;
pub mod receipt;
pub mod report;
pub mod store;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::glob;
use tracing::debug;

use subsidy_core::models::config::EngineConfig;
use subsidy_core::{CanonicalRecord, CanonicalTable, Converter};

/// Output format for canonical tables.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV with the canonical header row
    Csv,
    /// JSON `{header, rows}`
    Json,
}

/// Load the engine configuration from `--config`, else the default file,
/// else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<EngineConfig> {
    if let Some(path) = config_path {
        return EngineConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config {}", path));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        return EngineConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config {}", default_path.display()));
    }

    Ok(EngineConfig::default())
}

pub fn converter(config_path: Option<&str>) -> anyhow::Result<Converter> {
    Ok(Converter::new(load_config(config_path)?))
}

/// Expand glob patterns in submission order. A pattern matching nothing
/// is kept as a literal path so the failure names it.
pub fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let mut matched: Vec<PathBuf> = glob(pattern)
            .with_context(|| format!("Invalid pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .collect();
        if matched.is_empty() {
            files.push(PathBuf::from(pattern));
        } else {
            matched.sort();
            files.append(&mut matched);
        }
    }
    Ok(files)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Text of a document: extracted from PDFs, read verbatim otherwise.
pub fn read_document_text(converter: &Converter, path: &Path) -> anyhow::Result<String> {
    if extension(path) == "pdf" {
        let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let text = converter
            .pdf_text(&data)
            .with_context(|| format!("Failed to extract text from {}", path.display()))?;
        if text.trim().is_empty() {
            anyhow::bail!("No text extracted from {}", path.display());
        }
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Read a CSV file and map its header onto the canonical schema.
pub fn read_canonical_csv(converter: &Converter, path: &Path) -> anyhow::Result<CanonicalTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let header: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("{}: bad CSV row {}", path.display(), i + 1))?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(converter.canonicalize(&header, &rows))
}

/// Write a canonical table as CSV.
pub fn write_canonical_csv<W: Write>(writer: W, table: &CanonicalTable) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.header)?;
    for record in &table.rows {
        wtr.write_record(record.fields())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render a canonical table in the requested format.
pub fn render_table(table: &CanonicalTable, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(table)?),
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_canonical_csv(&mut buf, table)?;
            Ok(String::from_utf8(buf)?)
        }
    }
}

/// Write to `output` if given, else stdout.
pub fn emit(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} Output written to {}", console::style("✓").green(), path.display());
        }
        None => println!("{}", content.trim_end()),
    }
    Ok(())
}

/// Build a table with the configured header labels.
pub fn table_with_config_header(config: &EngineConfig, rows: Vec<CanonicalRecord>) -> CanonicalTable {
    CanonicalTable::new(config.schema.headers.clone(), rows)
}
