//! Extract command - usage table to canonical rows.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use subsidy_core::PageGrid;

use super::{OutputFormat, converter, emit, render_table};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Page grid JSON (list of tables of rows of cells) or a PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let converter = converter(config_path)?;
    let path = &args.input;

    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    let table = if is_pdf {
        let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        converter
            .extract_pdf_table(&data)
            .with_context(|| format!("{}: no usage table extracted", path.display()))?
    } else {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let grid = PageGrid::from_json(&json)
            .with_context(|| format!("{}: not a page grid", path.display()))?;
        converter
            .extract_table(&grid)
            .with_context(|| format!("{}: no usage table extracted", path.display()))?
    };

    info!("{}: {} rows", path.display(), table.rows.len());
    emit(args.output.as_deref(), &render_table(&table, args.format)?)
}
