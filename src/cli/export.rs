//! CLI commands for data export
//!
//! Provides commands for exporting data in various formats.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use super::{parse_month_or, today};
use crate::config::settings::Settings;
use crate::error::{FinsightError, FinsightResult};
use crate::export::{json, spreadsheet, yaml};
use crate::models::UserId;
use crate::storage::Storage;

/// Full export format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export one month of transactions as a spreadsheet (.xlsx, or CSV for .csv files)
    Spreadsheet {
        /// Output file; defaults to transactions-YYYY-MM.xlsx in the exports directory
        output: Option<PathBuf>,

        /// Month to export (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Export all of your data to a file
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show what an export would contain without writing files
    Info,
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, settings: &Settings, cmd: ExportCommands) -> FinsightResult<()> {
    let user = settings.require_user()?;

    match cmd {
        ExportCommands::Spreadsheet { output, month } => handle_export_spreadsheet(storage, user, output, month),
        ExportCommands::All {
            output,
            format,
            pretty,
        } => handle_export_all(storage, user, output, format, pretty),
        ExportCommands::Info => handle_export_info(storage, user),
    }
}

fn create_output(path: &Path) -> FinsightResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        FinsightError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

fn handle_export_spreadsheet(
    storage: &Storage,
    user: UserId,
    output: Option<PathBuf>,
    month: Option<String>,
) -> FinsightResult<()> {
    let month = parse_month_or(month.as_deref(), today())?;
    let output = output.unwrap_or_else(|| {
        storage
            .paths()
            .export_dir()
            .join(spreadsheet::default_file_name(month))
    });
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let transactions = storage.transactions.get_for_month(user, month)?;
    let categories = storage.categories.get_for_user(user)?;

    let format = spreadsheet::SheetFormat::from_path(&output);
    let writer = create_output(&output)?;
    let count = spreadsheet::export_month_as(format, &transactions, &categories, month, writer)?;

    println!(
        "Exported {} transactions for {} to: {}",
        count,
        month.label(),
        output.display()
    );
    Ok(())
}

fn handle_export_all(
    storage: &Storage,
    user: UserId,
    output: PathBuf,
    format: ExportFormat,
    pretty: bool,
) -> FinsightResult<()> {
    let mut writer = create_output(&output)?;

    match format {
        ExportFormat::Json => json::export_full_json(storage, user, &mut writer, pretty)?,
        ExportFormat::Yaml => yaml::export_full_yaml(storage, user, &mut writer)?,
    }
    writer.flush()?;

    println!("All data exported to: {}", output.display());
    Ok(())
}

fn handle_export_info(storage: &Storage, user: UserId) -> FinsightResult<()> {
    let export = json::FullExport::from_storage(storage, user)?;

    println!("Export Information");
    println!("==================\n");

    println!("Schema Version: {}", export.schema_version);
    println!("App Version:    {}", export.app_version);
    println!();

    println!("Data Summary:");
    println!("  Transactions:  {}", export.metadata.transaction_count);
    println!("  Categories:    {}", export.metadata.category_count);
    println!("  Budgets:       {}", export.metadata.budget_count);
    println!("  Goals:         {}", export.metadata.goal_count);
    println!("  Recurring:     {}", export.metadata.recurring_count);

    if let (Some(earliest), Some(latest)) = (
        &export.metadata.earliest_transaction,
        &export.metadata.latest_transaction,
    ) {
        println!();
        println!("Transaction Date Range: {} to {}", earliest, latest);
    }

    println!("\nExamples:");
    println!("  finsight export spreadsheet --month 2025-01");
    println!("  finsight export all backup.json --pretty");
    println!("  finsight export all backup.yaml --format yaml");

    Ok(())
}
