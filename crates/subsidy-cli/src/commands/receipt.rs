//! Receipt command - extract canonical rows from receipts.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use subsidy_core::{CanonicalRecord, Converter};

use super::{OutputFormat, converter, emit, expand_inputs, read_document_text, render_table, table_with_config_header};

/// Arguments for the receipt command.
#[derive(Args)]
pub struct ReceiptArgs {
    /// Input files or glob patterns (PDF or text), processed in order
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Year assumed for receipts that print none
    #[arg(long)]
    year: Option<i32>,

    /// Report failed files and keep going instead of stopping
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    record: Option<CanonicalRecord>,
    warnings: Vec<String>,
    error: Option<String>,
}

fn extract_one(converter: &Converter, path: &Path) -> anyhow::Result<(CanonicalRecord, Vec<String>)> {
    let text = read_document_text(converter, path)?;
    let extraction = converter
        .extract_receipt(&text)
        .with_context(|| format!("{}", path.display()))?;
    Ok((extraction.record, extraction.warnings))
}

pub fn run(args: ReceiptArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut converter = converter(config_path)?;
    if let Some(year) = args.year {
        converter = converter.with_fallback_year(year);
    }

    let files = expand_inputs(&args.inputs)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        match extract_one(&converter, &path) {
            Ok((record, warnings)) => results.push(FileResult {
                path,
                record: Some(record),
                warnings,
                error: None,
            }),
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if !args.continue_on_error {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    return Err(e.context(format!("Receipt batch stopped at {}", path.display())));
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                results.push(FileResult {
                    path,
                    record: None,
                    warnings: Vec::new(),
                    error: Some(error_msg),
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    for result in &results {
        for warning in &result.warnings {
            eprintln!("{} {}: {}", style("!").yellow(), result.path.display(), warning);
        }
    }

    let failed: Vec<&FileResult> = results.iter().filter(|r| r.error.is_some()).collect();
    let records: Vec<CanonicalRecord> = results.iter().filter_map(|r| r.record.clone()).collect();

    let table = table_with_config_header(converter.config(), records);
    let content = render_table(&table, args.format)?;
    emit(args.output.as_deref(), &content)?;

    eprintln!(
        "{} Processed {} files in {:?}: {} successful, {} failed",
        style("✓").green(),
        results.len(),
        start.elapsed(),
        style(table.rows.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}
