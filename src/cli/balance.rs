//! Balance CLI commands

use clap::Subcommand;

use super::resolve_group;
use crate::config::settings::Settings;
use crate::display::balance::{format_balance_table, format_settlements, format_totals};
use crate::error::LedgerResult;
use crate::services::BalanceService;
use crate::storage::Storage;

/// Balance subcommands
#[derive(Subcommand)]
pub enum BalanceCommands {
    /// Show net balances and totals
    Show {
        /// Group name or ID
        group: String,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest transfers that settle the group
    Settle {
        /// Group name or ID
        group: String,
        /// Print the settlements as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a plain-text summary of the group
    Summary {
        /// Group name or ID
        group: String,
    },
}

/// Handle a balance command
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BalanceCommands,
) -> LedgerResult<()> {
    let service = BalanceService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BalanceCommands::Show { group, json } => {
            let group = resolve_group(storage, settings, &group)?;
            let report = service.report(group.id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("Balances for {}", group.name);
            println!();
            print!("{}", format_balance_table(&report.balances, symbol));
            println!();
            print!("{}", format_totals(&report.totals, symbol));
        }

        BalanceCommands::Settle { group, json } => {
            let group = resolve_group(storage, settings, &group)?;
            let report = service.report(group.id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report.settlements)?);
                return Ok(());
            }

            print!(
                "{}",
                format_settlements(&report.settlements, &report.balances, symbol)
            );
        }

        BalanceCommands::Summary { group } => {
            let group = resolve_group(storage, settings, &group)?;
            print!("{}", service.summary(group.id, symbol)?);
        }
    }

    Ok(())
}
