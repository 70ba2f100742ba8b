//! CLI application for babysitter subsidy claims.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{classify, config, extract, receipt, report, store};

/// Babysitter subsidy - turn invoices and receipts into monthly claim reports
#[derive(Parser)]
#[command(name = "subsidy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the usage table from a page grid or PDF
    Extract(extract::ExtractArgs),

    /// Extract receipts, in order, into canonical rows
    Receipt(receipt::ReceiptArgs),

    /// Classify documents as receipt or invoice table
    Classify(classify::ClassifyArgs),

    /// Build the monthly claim report from canonical rows
    Report(report::ReportArgs),

    /// Manage the canonical CSV store
    Store(store::StoreArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path),
        Commands::Receipt(args) => receipt::run(args, config_path),
        Commands::Classify(args) => classify::run(args, config_path),
        Commands::Report(args) => report::run(args, config_path),
        Commands::Store(args) => store::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}
