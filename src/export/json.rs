//! JSON Export functionality
//!
//! Exports the complete database to JSON format with schema versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, Group, Participant, User};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub participants: Vec<Participant>,
    pub expenses: Vec<Expense>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub user_count: usize,
    pub group_count: usize,
    pub participant_count: usize,
    pub expense_count: usize,

    /// Date range of expenses (earliest)
    pub earliest_expense: Option<String>,

    /// Date range of expenses (latest)
    pub latest_expense: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> LedgerResult<Self> {
        let users = storage.users.get_all()?;
        let groups = storage.groups.get_all()?;
        let participants = storage.participants.get_all()?;
        let expenses = storage.expenses.get_all()?;

        let metadata = ExportMetadata {
            user_count: users.len(),
            group_count: groups.len(),
            participant_count: participants.len(),
            expense_count: expenses.len(),
            earliest_expense: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_expense: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            users,
            groups,
            participants,
            expenses,
            metadata,
        })
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let user_ids: HashSet<_> = self.users.iter().map(|u| u.id).collect();
        let group_ids: HashSet<_> = self.groups.iter().map(|g| g.id).collect();

        for group in &self.groups {
            if !user_ids.contains(&group.owner_id) {
                return Err(format!(
                    "Group {} references unknown owner {}",
                    group.id, group.owner_id
                ));
            }
        }

        for participant in &self.participants {
            if !group_ids.contains(&participant.group_id) {
                return Err(format!(
                    "Participant {} references unknown group {}",
                    participant.id, participant.group_id
                ));
            }
        }

        // Owners count as members of their own groups
        for expense in &self.expenses {
            let Some(group) = self.groups.iter().find(|g| g.id == expense.group_id) else {
                return Err(format!(
                    "Expense {} references unknown group {}",
                    expense.id, expense.group_id
                ));
            };
            if !group.is_member(expense.payer_id) {
                return Err(format!(
                    "Expense {} is paid by {} who is not in group {}",
                    expense.id, expense.payer_id, group.id
                ));
            }
            for split in &expense.splits {
                if !group.is_member(split.participant_id) {
                    return Err(format!(
                        "Expense {} has a split for {} who is not in group {}",
                        expense.id, split.participant_id, group.id
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> LedgerResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a JSON export and check its integrity
pub fn import_from_json(json_str: &str) -> LedgerResult<FullExport> {
    let export: FullExport = serde_json::from_str(json_str)?;
    export.validate().map_err(LedgerError::Validation)?;
    Ok(export)
}
