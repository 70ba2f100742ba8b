//! Report command - canonical CSV to claim report JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::info;

use super::{converter, emit, read_canonical_csv};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Canonical CSV (or any CSV whose header maps onto it)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include skipped rows in the output
    #[arg(long)]
    with_skipped: bool,
}

pub fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let converter = converter(config_path)?;
    let table = read_canonical_csv(&converter, &args.input)?;

    let result = converter
        .build_report(&table.rows)
        .with_context(|| format!("{}: no report built", args.input.display()))?;

    for issue in &result.skipped {
        eprintln!(
            "{} {}: skipped row {}: {}",
            style("!").yellow(),
            args.input.display(),
            issue.row,
            issue.reason
        );
    }
    info!(
        "{}: report for month {}, request {}",
        args.input.display(),
        result.report.month,
        result.report.page1.request_amount
    );

    let json = if args.with_skipped {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string_pretty(&result.report)?
    };
    emit(args.output.as_deref(), &json)
}
