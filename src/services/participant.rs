//! Participant service
//!
//! Named members of a group. The group owner is a member too but is never
//! stored as a participant, so it cannot be edited or removed here.

use crate::audit::{generate_diff, EntityType};
use crate::engine::LedgerSource;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{GroupId, Participant, ParticipantId, MAX_PARTICIPANTS};
use crate::storage::Storage;

/// Changes to apply to a participant; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ParticipantUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the color
    pub color: Option<Option<String>>,
    /// `Some(None)` clears the avatar
    pub avatar: Option<Option<String>>,
}

impl ParticipantUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.avatar.is_none()
    }
}

/// Service for participant management
pub struct ParticipantService<'a> {
    storage: &'a Storage,
}

impl<'a> ParticipantService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a participant to a group
    pub fn add(
        &self,
        group_id: GroupId,
        name: &str,
        color: Option<String>,
        avatar: Option<String>,
    ) -> LedgerResult<Participant> {
        let mut group = self
            .storage
            .groups
            .get(group_id)?
            .ok_or_else(|| LedgerError::group_not_found(group_id.to_string()))?;

        if !group.has_room() {
            return Err(LedgerError::ParticipantLimit {
                max: MAX_PARTICIPANTS,
            });
        }

        let name = name.trim();
        self.ensure_name_free(group_id, name, None)?;

        let mut participant = Participant::new(group_id, name);
        participant.color = color;
        participant.avatar = avatar;
        participant
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let before = group.clone();
        group.add_participant(participant.id);

        self.storage.participants.upsert(participant.clone())?;
        self.storage.groups.upsert(group.clone())?;
        self.storage.participants.save()?;
        self.storage.groups.save()?;

        self.storage.log_create(
            EntityType::Participant,
            participant.id.to_string(),
            Some(participant.name.clone()),
            &participant,
        )?;
        self.storage.log_update(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &before,
            &group,
            Some(format!("added participant {}", participant.name)),
        )?;

        Ok(participant)
    }

    /// Stored participants of a group, in joining order
    pub fn list(&self, group_id: GroupId) -> LedgerResult<Vec<Participant>> {
        self.storage.participants.get_by_group(group_id)
    }

    /// Every member of a group: the owner first, then the participants
    pub fn members(&self, group_id: GroupId) -> LedgerResult<Vec<Participant>> {
        let mut members = vec![self.storage.group_owner(group_id)?];
        members.extend(self.list(group_id)?);
        Ok(members)
    }

    /// Find a member (owner included) by name or ID string
    pub fn find(&self, group_id: GroupId, identifier: &str) -> LedgerResult<Option<Participant>> {
        let members = self.members(group_id)?;
        let found = members
            .iter()
            .position(|p| p.matches_name(identifier))
            .or_else(|| members.iter().position(|p| p.id.matches(identifier)));
        Ok(found.map(|index| members[index].clone()))
    }

    /// Like `find`, but a miss is an error
    pub fn require(&self, group_id: GroupId, identifier: &str) -> LedgerResult<Participant> {
        self.find(group_id, identifier)?
            .ok_or_else(|| LedgerError::participant_not_found(identifier))
    }

    /// Apply an update to a stored participant
    pub fn update(
        &self,
        id: ParticipantId,
        update: ParticipantUpdate,
    ) -> LedgerResult<Participant> {
        let mut participant = self
            .storage
            .participants
            .get(id)?
            .ok_or_else(|| LedgerError::participant_not_found(id.to_string()))?;
        let before = participant.clone();

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            self.ensure_name_free(participant.group_id, &name, Some(id))?;
            participant.name = name;
        }
        if let Some(color) = update.color {
            participant.color = color;
        }
        if let Some(avatar) = update.avatar {
            participant.avatar = avatar;
        }

        participant
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.participants.upsert(participant.clone())?;
        self.storage.participants.save()?;

        let diff = match (
            serde_json::to_value(&before),
            serde_json::to_value(&participant),
        ) {
            (Ok(old), Ok(new)) => generate_diff(&old, &new),
            _ => None,
        };
        self.storage.log_update(
            EntityType::Participant,
            participant.id.to_string(),
            Some(participant.name.clone()),
            &before,
            &participant,
            diff,
        )?;

        Ok(participant)
    }

    /// Remove a participant that no expense refers to
    pub fn remove(&self, id: ParticipantId) -> LedgerResult<Participant> {
        self.storage.remove_participant(id)
    }

    fn ensure_name_free(
        &self,
        group_id: GroupId,
        name: &str,
        exclude: Option<ParticipantId>,
    ) -> LedgerResult<()> {
        let clash = self
            .members(group_id)?
            .into_iter()
            .any(|p| Some(p.id) != exclude && p.matches_name(name));
        if clash {
            return Err(LedgerError::Duplicate {
                entity_type: "Participant",
                identifier: name.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, User};
    use crate::services::testing::create_test_storage;
    use crate::services::{GroupService, UserService};

    fn setup(storage: &Storage) -> (User, Group) {
        let owner = UserService::new(storage).create("Alice", None).unwrap();
        let group = GroupService::new(storage)
            .create(owner.id, "Flat", &[])
            .unwrap();
        (owner, group)
    }

    #[test]
    fn test_add_until_full() {
        let (_temp, storage) = create_test_storage();
        let (_owner, group) = setup(&storage);
        let service = ParticipantService::new(&storage);

        for name in ["Bob", "Carol", "Dave"] {
            service.add(group.id, name, None, None).unwrap();
        }
        let err = service.add(group.id, "Erin", None, None).unwrap_err();
        assert!(matches!(err, LedgerError::ParticipantLimit { max: 3 }));
        assert_eq!(
            err.to_string(),
            "Maximum 3 participants allowed per group"
        );

        let stored = storage.groups.get(group.id).unwrap().unwrap();
        assert_eq!(stored.participant_ids.len(), 3);
        assert_eq!(service.members(group.id).unwrap().len(), 4);
    }

    #[test]
    fn test_add_validation() {
        let (_temp, storage) = create_test_storage();
        let (_owner, group) = setup(&storage);
        let service = ParticipantService::new(&storage);

        assert!(service.add(group.id, " ", None, None).unwrap_err().is_validation());
        assert!(service
            .add(group.id, "Bob", Some("blue".into()), None)
            .unwrap_err()
            .is_validation());
        assert!(matches!(
            service.add(group.id, "ALICE", None, None).unwrap_err(),
            LedgerError::Duplicate { .. }
        ));
        assert!(service
            .add(GroupId::new(), "Bob", None, None)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_find_includes_owner() {
        let (_temp, storage) = create_test_storage();
        let (owner, group) = setup(&storage);
        let service = ParticipantService::new(&storage);
        let bob = service.add(group.id, "Bob", None, None).unwrap();

        assert_eq!(
            service.find(group.id, "alice").unwrap().unwrap().id,
            owner.participant_id()
        );
        assert_eq!(
            service.find(group.id, &bob.id.to_string()).unwrap().unwrap().id,
            bob.id
        );
        assert!(service.require(group.id, "Zed").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update() {
        let (_temp, storage) = create_test_storage();
        let (owner, group) = setup(&storage);
        let service = ParticipantService::new(&storage);
        let bob = service
            .add(group.id, "Bob", None, Some("B".into()))
            .unwrap();

        let updated = service
            .update(
                bob.id,
                ParticipantUpdate {
                    name: Some("Robert".into()),
                    color: Some(Some("#aa00cc".into())),
                    avatar: Some(None),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Robert");
        assert_eq!(updated.color.as_deref(), Some("#aa00cc"));
        assert!(updated.avatar.is_none());

        let diff = storage.audit().read_recent(1).unwrap()[0]
            .diff_summary
            .clone()
            .unwrap();
        assert!(diff.contains("name: \"Bob\" -> \"Robert\""));

        // Owner is not a stored participant
        let err = service
            .update(owner.participant_id(), ParticipantUpdate::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove() {
        let (_temp, storage) = create_test_storage();
        let (_owner, group) = setup(&storage);
        let service = ParticipantService::new(&storage);
        let bob = service.add(group.id, "Bob", None, None).unwrap();

        service.remove(bob.id).unwrap();
        assert!(service.list(group.id).unwrap().is_empty());
        assert!(service.remove(bob.id).unwrap_err().is_not_found());
    }
}
