//! CLI commands for data export
//!
//! Provides commands for exporting data in various formats.

use clap::Subcommand;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::resolve_group;
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{csv, json};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the full database to JSON
    Json {
        /// Output file path
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export expenses and their splits to CSV
    Csv {
        /// Output file path
        output: PathBuf,

        /// Only export this group (name or ID)
        #[arg(short, long)]
        group: Option<String>,
    },
}

fn create_file(output: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        LedgerError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> LedgerResult<()> {
    match cmd {
        ExportCommands::Json { output, pretty } => {
            let mut writer = create_file(&output)?;
            json::export_full_json(storage, &mut writer, pretty)?;
            println!("Full database exported to: {}", output.display());
        }

        ExportCommands::Csv { output, group } => {
            let group_id = group
                .map(|g| resolve_group(storage, settings, &g).map(|g| g.id))
                .transpose()?;
            let writer = create_file(&output)?;
            let count = csv::export_expenses_csv(storage, writer, group_id)?;
            println!("Exported {} expenses to: {}", count, output.display());
        }
    }

    Ok(())
}
