//! Storage layer for SplitLedger
//!
//! JSON file storage with atomic writes. Each repository keeps its entities in
//! memory behind an `RwLock` and is persisted explicitly with `save`.

pub mod expenses;
pub mod file_io;
pub mod groups;
pub mod participants;
pub mod users;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use groups::GroupRepository;
pub use participants::ParticipantRepository;
pub use users::UserRepository;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::engine::LedgerSource;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, Group, GroupId, Participant, ParticipantId};

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> LedgerResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> LedgerResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    audit: AuditLogger,
    pub users: UserRepository,
    pub groups: GroupRepository,
    pub participants: ParticipantRepository,
    pub expenses: ExpenseRepository,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            users: UserRepository::new(paths.users_file()),
            groups: GroupRepository::new(paths.groups_file()),
            participants: ParticipantRepository::new(paths.participants_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            paths,
        })
    }

    /// Create storage and load everything from disk
    pub fn open(paths: LedgerPaths) -> LedgerResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_all(&self) -> LedgerResult<()> {
        self.users.load()?;
        self.groups.load()?;
        self.participants.load()?;
        self.expenses.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> LedgerResult<()> {
        self.users.save()?;
        self.groups.save()?;
        self.participants.save()?;
        self.expenses.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> LedgerResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Delete a group with all of its participants and expenses
    ///
    /// Every removed entity gets its own audit entry, written in one batch.
    pub fn delete_group_cascade(&self, group_id: GroupId) -> LedgerResult<Group> {
        let group = self
            .groups
            .delete(group_id)?
            .ok_or_else(|| LedgerError::group_not_found(group_id.to_string()))?;
        let expenses = self.expenses.delete_by_group(group_id)?;
        let participants = self.participants.delete_by_group(group_id)?;

        self.groups.save()?;
        self.expenses.save()?;
        self.participants.save()?;

        let mut entries: Vec<AuditEntry> = expenses
            .iter()
            .map(|e| {
                AuditEntry::delete(
                    EntityType::Expense,
                    e.id.to_string(),
                    Some(e.description.clone()),
                    e,
                )
            })
            .collect();
        entries.extend(participants.iter().map(|p| {
            AuditEntry::delete(
                EntityType::Participant,
                p.id.to_string(),
                Some(p.name.clone()),
                p,
            )
        }));
        entries.push(AuditEntry::delete(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        ));
        self.audit.log_batch(&entries)?;

        Ok(group)
    }

    /// Remove a participant from its group
    ///
    /// Refused while any expense still pays for or covers the participant,
    /// since dropping their splits would leave the remaining balances uneven.
    pub fn remove_participant(&self, participant_id: ParticipantId) -> LedgerResult<Participant> {
        let participant = self
            .participants
            .get(participant_id)?
            .ok_or_else(|| LedgerError::participant_not_found(participant_id.to_string()))?;

        if self
            .expenses
            .references_participant(participant.group_id, participant_id)?
        {
            return Err(LedgerError::Validation(format!(
                "{} still appears in expenses; delete or edit those first",
                participant.name
            )));
        }

        self.participants.delete(participant_id)?;
        if let Some(mut group) = self.groups.get(participant.group_id)? {
            group.remove_participant(participant_id);
            self.groups.upsert(group)?;
            self.groups.save()?;
        }
        self.participants.save()?;

        self.log_delete(
            EntityType::Participant,
            participant.id.to_string(),
            Some(participant.name.clone()),
            &participant,
        )?;

        Ok(participant)
    }
}

impl LedgerSource for Storage {
    fn group_expenses(&self, group_id: GroupId) -> LedgerResult<Vec<Expense>> {
        self.expenses.get_by_group(group_id)
    }

    fn group_participants(&self, group_id: GroupId) -> LedgerResult<Vec<Participant>> {
        self.participants.get_by_group(group_id)
    }

    fn group_owner(&self, group_id: GroupId) -> LedgerResult<Participant> {
        let group = self
            .groups
            .get(group_id)?
            .ok_or_else(|| LedgerError::group_not_found(group_id.to_string()))?;
        let owner = self
            .users
            .get(group.owner_id)?
            .ok_or_else(|| LedgerError::user_not_found(group.owner_id.to_string()))?;
        Ok(owner.as_participant(group_id))
    }
}
