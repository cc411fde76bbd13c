//! Audit log CLI command

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::storage::Storage;

fn parse_entity_type(input: &str) -> LedgerResult<EntityType> {
    match input.trim().to_lowercase().as_str() {
        "user" => Ok(EntityType::User),
        "group" => Ok(EntityType::Group),
        "participant" => Ok(EntityType::Participant),
        "expense" => Ok(EntityType::Expense),
        other => Err(LedgerError::Validation(format!(
            "Unknown entity type '{}'. Valid types: user, group, participant, expense",
            other
        ))),
    }
}

/// Print the most recent audit entries, newest last
pub fn handle_audit_command(
    storage: &Storage,
    count: usize,
    entity: Option<String>,
) -> LedgerResult<()> {
    let entries = match entity {
        Some(entity) => {
            let entries = storage.audit().read_for(parse_entity_type(&entity)?)?;
            let skip = entries.len().saturating_sub(count);
            entries.into_iter().skip(skip).collect()
        }
        None => storage.audit().read_recent(count)?,
    };

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
