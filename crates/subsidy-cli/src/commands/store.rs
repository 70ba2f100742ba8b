//! Store command - validated canonical CSV storage with backups.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::{Args, Subcommand};
use console::style;
use tracing::{debug, info};

use subsidy_core::records::validate_records;

use super::{converter, read_canonical_csv, table_with_config_header, write_canonical_csv};

const BACKUP_INFIX: &str = ".backup.";

/// Arguments for the store command.
#[derive(Args)]
pub struct StoreArgs {
    #[command(subcommand)]
    command: StoreCommand,
}

#[derive(Subcommand)]
enum StoreCommand {
    /// Print stored rows as JSON
    Read {
        /// Stored CSV file
        file: PathBuf,
    },

    /// Validate rows and write them to the store, backing up the old file
    Save {
        /// CSV with the rows to store
        input: PathBuf,

        /// Store file to write
        #[arg(long)]
        to: PathBuf,
    },

    /// List backups of a store file, newest first
    Backups {
        /// Store file
        file: PathBuf,
    },

    /// Validate a CSV without writing anything
    Validate {
        /// CSV file
        file: PathBuf,
    },
}

pub fn run(args: StoreArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        StoreCommand::Read { file } => read_store(&file, config_path),
        StoreCommand::Save { input, to } => save_store(&input, &to, config_path),
        StoreCommand::Backups { file } => list_backups(&file),
        StoreCommand::Validate { file } => validate_file(&file, config_path),
    }
}

fn read_store(file: &Path, config_path: Option<&str>) -> anyhow::Result<()> {
    let converter = converter(config_path)?;
    let table = read_canonical_csv(&converter, file)?;
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

/// Path of a backup of `file` taken now.
fn backup_path(file: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut name = file.as_os_str().to_os_string();
    name.push(format!("{}{}", BACKUP_INFIX, stamp));
    PathBuf::from(name)
}

fn save_store(input: &Path, to: &Path, config_path: Option<&str>) -> anyhow::Result<()> {
    let converter = converter(config_path)?;
    let table = read_canonical_csv(&converter, input)?;

    validate_records(&table.rows).with_context(|| format!("{}: validation failed", input.display()))?;

    if to.exists() {
        let backup = backup_path(to);
        fs::copy(to, &backup)
            .with_context(|| format!("Failed to back up {} to {}", to.display(), backup.display()))?;
        info!("Backed up {} to {}", to.display(), backup.display());
        println!("{} Backup written to {}", style("ℹ").blue(), backup.display());
    }

    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let table = table_with_config_header(converter.config(), table.rows);
    let file = fs::File::create(to).with_context(|| format!("Failed to create {}", to.display()))?;
    write_canonical_csv(file, &table)?;

    println!(
        "{} Saved {} rows to {}",
        style("✓").green(),
        table.rows.len(),
        to.display()
    );
    Ok(())
}

/// Backups of `file`, newest first.
fn find_backups(file: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
        anyhow::bail!("Not a file path: {}", file.display());
    };
    let prefix = format!("{}{}", name, BACKUP_INFIX);
    let dir = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups: Vec<PathBuf> = fs::read_dir(&dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
        })
        .collect();

    // Timestamps sort lexically.
    backups.sort();
    backups.reverse();
    debug!("Found {} backups of {}", backups.len(), file.display());
    Ok(backups)
}

fn list_backups(file: &Path) -> anyhow::Result<()> {
    let backups = find_backups(file)?;
    if backups.is_empty() {
        println!("{} No backups of {}", style("ℹ").blue(), file.display());
    }
    for backup in backups {
        println!("{}", backup.display());
    }
    Ok(())
}

fn validate_file(file: &Path, config_path: Option<&str>) -> anyhow::Result<()> {
    let converter = converter(config_path)?;
    let table = read_canonical_csv(&converter, file)?;

    validate_records(&table.rows).with_context(|| format!("{}: validation failed", file.display()))?;

    println!(
        "{} {} rows valid",
        style("✓").green(),
        table.rows.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_suffix() {
        let path = backup_path(Path::new("/tmp/usage.csv"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("usage.csv.backup."));
        // YYYYmmdd_HHMMSS
        assert_eq!(name.len(), "usage.csv.backup.".len() + 15);
    }

    #[test]
    fn test_find_backups_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("usage.csv");
        for stamp in ["20250101_000000", "20250301_000000", "20250201_000000"] {
            fs::write(dir.path().join(format!("usage.csv.backup.{}", stamp)), "").unwrap();
        }
        fs::write(dir.path().join("other.csv.backup.20250401_000000"), "").unwrap();

        let backups = find_backups(&file).unwrap();
        let names: Vec<String> = backups
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "usage.csv.backup.20250301_000000",
                "usage.csv.backup.20250201_000000",
                "usage.csv.backup.20250101_000000",
            ]
        );
    }
}
