//! Participant CLI commands

use clap::Subcommand;

use super::resolve_group;
use crate::config::settings::Settings;
use crate::display::group::format_participant_list;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{GroupId, Participant, ParticipantId};
use crate::services::{ParticipantService, ParticipantUpdate};
use crate::storage::Storage;

/// Participant subcommands
#[derive(Subcommand)]
pub enum ParticipantCommands {
    /// Add a participant to a group
    Add {
        /// Group name or ID
        group: String,
        /// Participant name
        name: String,
        /// Display color (#rrggbb)
        #[arg(short, long)]
        color: Option<String>,
        /// Avatar (emoji, initials or URL)
        #[arg(short, long)]
        avatar: Option<String>,
    },
    /// List a group's members
    List {
        /// Group name or ID
        group: String,
    },
    /// Edit a participant
    Edit {
        /// Group name or ID
        group: String,
        /// Participant name or ID
        participant: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New display color (#rrggbb)
        #[arg(short, long, conflicts_with = "clear_color")]
        color: Option<String>,
        /// Go back to the derived color
        #[arg(long)]
        clear_color: bool,
        /// New avatar
        #[arg(short, long, conflicts_with = "clear_avatar")]
        avatar: Option<String>,
        /// Remove the avatar
        #[arg(long)]
        clear_avatar: bool,
    },
    /// Remove a participant no expense refers to
    Remove {
        /// Group name or ID
        group: String,
        /// Participant name or ID
        participant: String,
    },
}

/// Set, clear or keep an optional field
fn optional_change(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

/// Resolve a stored participant; the owner is not editable here
fn stored_participant(
    service: &ParticipantService<'_>,
    group_owner_id: ParticipantId,
    group_id: GroupId,
    identifier: &str,
) -> LedgerResult<Participant> {
    let participant = service.require(group_id, identifier)?;
    if participant.id == group_owner_id {
        return Err(LedgerError::Validation(
            "The group owner is not a stored participant and cannot be edited or removed".into(),
        ));
    }
    Ok(participant)
}

/// Handle a participant command
pub fn handle_participant_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ParticipantCommands,
) -> LedgerResult<()> {
    let service = ParticipantService::new(storage);

    match cmd {
        ParticipantCommands::Add {
            group,
            name,
            color,
            avatar,
        } => {
            let group = resolve_group(storage, settings, &group)?;
            let participant = service.add(group.id, &name, color, avatar)?;
            println!("Added {} to {}", participant.name, group.name);
            println!("  ID: {}", participant.id);
        }

        ParticipantCommands::List { group } => {
            let group = resolve_group(storage, settings, &group)?;
            let members = service.members(group.id)?;
            print!("{}", format_participant_list(&members, &group));
        }

        ParticipantCommands::Edit {
            group,
            participant,
            name,
            color,
            clear_color,
            avatar,
            clear_avatar,
        } => {
            let group = resolve_group(storage, settings, &group)?;
            let found =
                stored_participant(&service, group.owner_participant_id(), group.id, &participant)?;

            let update = ParticipantUpdate {
                name,
                color: optional_change(color, clear_color),
                avatar: optional_change(avatar, clear_avatar),
            };
            if update.is_empty() {
                println!("No changes specified. Use --name, --color or --avatar.");
                return Ok(());
            }

            let updated = service.update(found.id, update)?;
            println!("Updated participant: {}", updated.name);
        }

        ParticipantCommands::Remove { group, participant } => {
            let group = resolve_group(storage, settings, &group)?;
            let found =
                stored_participant(&service, group.owner_participant_id(), group.id, &participant)?;
            let removed = service.remove(found.id)?;
            println!("Removed {} from {}", removed.name, group.name);
        }
    }

    Ok(())
}
