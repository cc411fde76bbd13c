//! Group service
//!
//! Groups are always looked up on behalf of their owner: a group that belongs
//! to another user is reported as not found.

use crate::audit::{generate_diff, EntityType};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Group, GroupId, Participant, UserId, MAX_PARTICIPANTS};
use crate::storage::Storage;

/// Service for group management
pub struct GroupService<'a> {
    storage: &'a Storage,
}

impl<'a> GroupService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a group, optionally with its first participants
    pub fn create(
        &self,
        owner_id: UserId,
        name: &str,
        participant_names: &[String],
    ) -> LedgerResult<Group> {
        let owner = self
            .storage
            .users
            .get(owner_id)?
            .ok_or_else(|| LedgerError::user_not_found(owner_id.to_string()))?;

        let name = name.trim();
        if self.storage.groups.get_by_name(owner_id, name)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Group",
                identifier: name.to_string(),
            });
        }

        if participant_names.len() > MAX_PARTICIPANTS {
            return Err(LedgerError::ParticipantLimit {
                max: MAX_PARTICIPANTS,
            });
        }

        let mut group = Group::new(name, owner_id);
        let mut participants: Vec<Participant> = Vec::with_capacity(participant_names.len());
        for participant_name in participant_names {
            let participant_name = participant_name.trim();
            let taken = owner.name.eq_ignore_ascii_case(participant_name)
                || participants.iter().any(|p| p.matches_name(participant_name));
            if taken {
                return Err(LedgerError::Duplicate {
                    entity_type: "Participant",
                    identifier: participant_name.to_string(),
                });
            }

            let participant = Participant::new(group.id, participant_name);
            participant
                .validate()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;
            group.add_participant(participant.id);
            participants.push(participant);
        }

        group
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        for participant in &participants {
            self.storage.participants.upsert(participant.clone())?;
        }
        self.storage.groups.upsert(group.clone())?;
        self.storage.participants.save()?;
        self.storage.groups.save()?;

        self.storage.log_create(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;
        for participant in &participants {
            self.storage.log_create(
                EntityType::Participant,
                participant.id.to_string(),
                Some(participant.name.clone()),
                participant,
            )?;
        }

        Ok(group)
    }

    /// Groups owned by a user, oldest first
    pub fn list(&self, owner_id: UserId) -> LedgerResult<Vec<Group>> {
        self.storage.groups.get_by_owner(owner_id)
    }

    /// Get a group by ID if the user owns it
    pub fn get(&self, owner_id: UserId, id: GroupId) -> LedgerResult<Option<Group>> {
        Ok(self
            .storage
            .groups
            .get(id)?
            .filter(|g| g.is_owned_by(owner_id)))
    }

    /// Find one of the user's groups by name or ID string
    pub fn find(&self, owner_id: UserId, identifier: &str) -> LedgerResult<Option<Group>> {
        if let Some(group) = self.storage.groups.get_by_name(owner_id, identifier)? {
            return Ok(Some(group));
        }

        Ok(self
            .list(owner_id)?
            .into_iter()
            .find(|g| g.id.matches(identifier)))
    }

    /// Like `find`, but a miss is an error
    pub fn require(&self, owner_id: UserId, identifier: &str) -> LedgerResult<Group> {
        self.find(owner_id, identifier)?
            .ok_or_else(|| LedgerError::group_not_found(identifier))
    }

    /// Rename a group
    pub fn rename(&self, owner_id: UserId, id: GroupId, new_name: &str) -> LedgerResult<Group> {
        let mut group = self
            .get(owner_id, id)?
            .ok_or_else(|| LedgerError::group_not_found(id.to_string()))?;
        let before = group.clone();

        let new_name = new_name.trim();
        if let Some(existing) = self.storage.groups.get_by_name(owner_id, new_name)? {
            if existing.id != id {
                return Err(LedgerError::Duplicate {
                    entity_type: "Group",
                    identifier: new_name.to_string(),
                });
            }
        }

        group.rename(new_name);
        group
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        let diff = generate_diff(
            &serde_json::json!({ "name": before.name }),
            &serde_json::json!({ "name": group.name }),
        );
        self.storage.log_update(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &before,
            &group,
            diff,
        )?;

        Ok(group)
    }

    /// Delete a group together with its participants and expenses
    pub fn delete(&self, owner_id: UserId, id: GroupId) -> LedgerResult<Group> {
        if self.get(owner_id, id)?.is_none() {
            return Err(LedgerError::group_not_found(id.to_string()));
        }
        self.storage.delete_group_cascade(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::create_test_storage;
    use crate::services::UserService;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_with_participants() {
        let (_temp, storage) = create_test_storage();
        let owner = UserService::new(&storage).create("Alice", None).unwrap();
        let service = GroupService::new(&storage);

        let group = service
            .create(owner.id, "Trip", &names(&["Bob", "Carol"]))
            .unwrap();

        assert_eq!(group.participant_ids.len(), 2);
        assert_eq!(storage.participants.get_by_group(group.id).unwrap().len(), 2);
        // Group plus two participants
        assert_eq!(storage.audit().entry_count().unwrap(), 4);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let (_temp, storage) = create_test_storage();
        let owner = UserService::new(&storage).create("Alice", None).unwrap();
        let service = GroupService::new(&storage);

        assert!(service.create(owner.id, "  ", &[]).unwrap_err().is_validation());

        let err = service
            .create(owner.id, "Big", &names(&["A", "B", "C", "D"]))
            .unwrap_err();
        assert!(matches!(err, LedgerError::ParticipantLimit { max: 3 }));

        let err = service
            .create(owner.id, "Dupes", &names(&["Bob", "bob"]))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));

        let err = service
            .create(owner.id, "Self", &names(&["alice"]))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));

        service.create(owner.id, "Trip", &[]).unwrap();
        let err = service.create(owner.id, "trip", &[]).unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));

        assert!(service
            .create(UserId::new(), "Orphan", &[])
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_find_is_scoped_to_owner() {
        let (_temp, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let alice = users.create("Alice", None).unwrap();
        let bob = users.create("Bob", None).unwrap();
        let service = GroupService::new(&storage);

        let group = service.create(alice.id, "Trip", &[]).unwrap();

        assert!(service.find(alice.id, "trip").unwrap().is_some());
        assert!(service
            .find(alice.id, &group.id.to_string())
            .unwrap()
            .is_some());
        assert!(service.find(bob.id, "Trip").unwrap().is_none());
        assert!(service
            .find(bob.id, &group.id.to_string())
            .unwrap()
            .is_none());
        assert!(service.require(bob.id, "Trip").unwrap_err().is_not_found());
        assert!(service.delete(bob.id, group.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_rename_and_delete() {
        let (_temp, storage) = create_test_storage();
        let owner = UserService::new(&storage).create("Alice", None).unwrap();
        let service = GroupService::new(&storage);

        let group = service.create(owner.id, "Trip", &names(&["Bob"])).unwrap();
        let renamed = service.rename(owner.id, group.id, "Road trip").unwrap();
        assert_eq!(renamed.name, "Road trip");

        let log = storage.audit().read_recent(1).unwrap();
        assert_eq!(
            log[0].diff_summary.as_deref(),
            Some("name: \"Trip\" -> \"Road trip\"")
        );

        service.delete(owner.id, group.id).unwrap();
        assert!(service.list(owner.id).unwrap().is_empty());
        assert_eq!(storage.participants.count().unwrap(), 0);
    }
}
