//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerResult;
use crate::models::{Expense, ExpenseId, GroupId, ParticipantId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with a group index
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: group_id -> expense_ids
    by_group: RwLock<HashMap<GroupId, Vec<ExpenseId>>>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_group: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        let mut by_group = write_lock(&self.by_group)?;
        data.clear();
        by_group.clear();

        for expense in file_data.expenses {
            by_group.entry(expense.group_id).or_default().push(expense.id);
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    pub fn save(&self) -> LedgerResult<()> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All expenses ordered by date, then creation time
    pub fn get_all(&self) -> LedgerResult<Vec<Expense>> {
        let data = read_lock(&self.data)?;
        let mut expenses: Vec<_> = data.values().cloned().collect();
        sort_expenses(&mut expenses);
        Ok(expenses)
    }

    /// A group's expenses ordered by date, then creation time
    pub fn get_by_group(&self, group_id: GroupId) -> LedgerResult<Vec<Expense>> {
        let data = read_lock(&self.data)?;
        let by_group = read_lock(&self.by_group)?;

        let mut expenses: Vec<_> = by_group
            .get(&group_id)
            .map(|ids| ids.iter().filter_map(|id| data.get(id).cloned()).collect())
            .unwrap_or_default();
        sort_expenses(&mut expenses);
        Ok(expenses)
    }

    /// Whether any expense in the group pays for or covers the participant
    pub fn references_participant(
        &self,
        group_id: GroupId,
        participant_id: ParticipantId,
    ) -> LedgerResult<bool> {
        Ok(self
            .get_by_group(group_id)?
            .iter()
            .any(|e| e.involves(participant_id)))
    }

    pub fn upsert(&self, expense: Expense) -> LedgerResult<()> {
        let mut data = write_lock(&self.data)?;
        let mut by_group = write_lock(&self.by_group)?;

        if let Some(old) = data.get(&expense.id) {
            if let Some(ids) = by_group.get_mut(&old.group_id) {
                ids.retain(|id| *id != expense.id);
            }
        }
        by_group.entry(expense.group_id).or_default().push(expense.id);

        data.insert(expense.id, expense);
        Ok(())
    }

    pub fn delete(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        let mut data = write_lock(&self.data)?;
        let mut by_group = write_lock(&self.by_group)?;

        let removed = data.remove(&id);
        if let Some(expense) = &removed {
            if let Some(ids) = by_group.get_mut(&expense.group_id) {
                ids.retain(|eid| *eid != id);
            }
        }
        Ok(removed)
    }

    /// Remove every expense of a group, returning what was removed
    pub fn delete_by_group(&self, group_id: GroupId) -> LedgerResult<Vec<Expense>> {
        let mut data = write_lock(&self.data)?;
        let mut by_group = write_lock(&self.by_group)?;

        let ids = by_group.remove(&group_id).unwrap_or_default();
        Ok(ids.iter().filter_map(|id| data.remove(id)).collect())
    }

    pub fn count(&self) -> LedgerResult<usize> {
        Ok(read_lock(&self.data)?.len())
    }
}

fn sort_expenses(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
