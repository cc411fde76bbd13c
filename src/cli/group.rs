//! Group CLI commands

use clap::Subcommand;

use super::resolve_group;
use crate::config::settings::Settings;
use crate::display::group::{format_group_details, format_group_list, GroupRow};
use crate::error::LedgerResult;
use crate::models::{Expense, Money};
use crate::services::{GroupService, ParticipantService};
use crate::storage::Storage;

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a new group owned by the active user
    Create {
        /// Group name
        name: String,
        /// Participant to add (repeatable, up to 3)
        #[arg(short, long = "participant")]
        participants: Vec<String>,
    },
    /// List the active user's groups
    List,
    /// Show group details and members
    Show {
        /// Group name or ID
        group: String,
    },
    /// Rename a group
    Rename {
        /// Group name or ID
        group: String,
        /// New name
        name: String,
    },
    /// Delete a group with all its participants and expenses
    Delete {
        /// Group name or ID
        group: String,
    },
}

fn total_spent(expenses: &[Expense]) -> Money {
    expenses.iter().map(|e| e.amount).sum()
}

/// Handle a group command
pub fn handle_group_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GroupCommands,
) -> LedgerResult<()> {
    let service = GroupService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GroupCommands::Create { name, participants } => {
            let owner_id = settings.require_active_user()?;
            let group = service.create(owner_id, &name, &participants)?;
            println!("Created group: {}", group.name);
            if !participants.is_empty() {
                println!("  Participants: {}", participants.join(", "));
            }
            println!("  ID: {}", group.id);
        }

        GroupCommands::List => {
            let owner_id = settings.require_active_user()?;
            let groups = service.list(owner_id)?;
            let mut stats = Vec::with_capacity(groups.len());
            for group in &groups {
                let expenses = storage.expenses.get_by_group(group.id)?;
                stats.push((expenses.len(), total_spent(&expenses)));
            }
            let rows: Vec<GroupRow<'_>> = groups
                .iter()
                .zip(stats)
                .map(|(group, (expense_count, total_spent))| GroupRow {
                    group,
                    expense_count,
                    total_spent,
                })
                .collect();
            print!("{}", format_group_list(&rows, symbol));
        }

        GroupCommands::Show { group } => {
            let group = resolve_group(storage, settings, &group)?;
            let members = ParticipantService::new(storage).members(group.id)?;
            let expenses = storage.expenses.get_by_group(group.id)?;
            print!(
                "{}",
                format_group_details(
                    &group,
                    &members,
                    expenses.len(),
                    total_spent(&expenses),
                    symbol
                )
            );
        }

        GroupCommands::Rename { group, name } => {
            let found = resolve_group(storage, settings, &group)?;
            let renamed = service.rename(found.owner_id, found.id, &name)?;
            println!("Renamed group '{}' to '{}'", found.name, renamed.name);
        }

        GroupCommands::Delete { group } => {
            let found = resolve_group(storage, settings, &group)?;
            let deleted = service.delete(found.owner_id, found.id)?;
            println!("Deleted group: {}", deleted.name);
        }
    }

    Ok(())
}
