//! CSV Export functionality
//!
//! Exports expenses to CSV: one row per expense followed by one row per split.

use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

use crate::error::LedgerResult;
use crate::models::{GroupId, ParticipantId};
use crate::storage::Storage;

#[derive(Debug, Serialize)]
struct ExpenseRow<'a> {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Participant")]
    participant: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Split Mode")]
    split_mode: String,
    #[serde(rename = "Row Type")]
    row_type: &'static str,
}

/// Export expenses to CSV, optionally limited to one group
///
/// Expense rows name the payer in the participant column; split rows name
/// the covered participant and carry their share.
pub fn export_expenses_csv<W: Write>(
    storage: &Storage,
    writer: W,
    group_id: Option<GroupId>,
) -> LedgerResult<usize> {
    let groups = storage.groups.get_all()?;
    let group_names: HashMap<_, _> = groups.iter().map(|g| (g.id, g.name.as_str())).collect();

    // Owners appear in expenses under their participant id
    let users = storage.users.get_all()?;
    let participants = storage.participants.get_all()?;
    let mut names: HashMap<ParticipantId, &str> = participants
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();
    for user in &users {
        names.insert(user.participant_id(), user.name.as_str());
    }
    let name_of = |id: ParticipantId| names.get(&id).copied().unwrap_or("Unknown");

    let expenses = match group_id {
        Some(id) => storage.expenses.get_by_group(id)?,
        None => storage.expenses.get_all()?,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    for expense in &expenses {
        let group = group_names
            .get(&expense.group_id)
            .copied()
            .unwrap_or("Unknown");
        let id = expense.id.to_string();
        let date = expense.date.to_string();
        let split_mode = expense.split_mode.to_string();

        csv_writer.serialize(ExpenseRow {
            id: id.clone(),
            group,
            date: date.clone(),
            description: &expense.description,
            participant: name_of(expense.payer_id),
            amount: expense.amount.to_decimal_string(),
            split_mode: split_mode.clone(),
            row_type: "expense",
        })?;

        for split in &expense.splits {
            csv_writer.serialize(ExpenseRow {
                id: format!("{}-split", id),
                group,
                date: date.clone(),
                description: &expense.description,
                participant: name_of(split.participant_id),
                amount: split.amount.to_decimal_string(),
                split_mode: split_mode.clone(),
                row_type: "split",
            })?;
        }
    }
    csv_writer.flush()?;

    Ok(expenses.len())
}
