//! Participant repository for JSON storage
//!
//! Manages loading and saving participants to participants.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerResult;
use crate::models::{GroupId, Participant, ParticipantId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ParticipantData {
    participants: Vec<Participant>,
}

/// Repository for participant persistence with a group index
pub struct ParticipantRepository {
    path: PathBuf,
    data: RwLock<HashMap<ParticipantId, Participant>>,
    /// Index: group_id -> participant_ids
    by_group: RwLock<HashMap<GroupId, Vec<ParticipantId>>>,
}

impl ParticipantRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_group: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        let file_data: ParticipantData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        let mut by_group = write_lock(&self.by_group)?;
        data.clear();
        by_group.clear();

        for participant in file_data.participants {
            by_group
                .entry(participant.group_id)
                .or_default()
                .push(participant.id);
            data.insert(participant.id, participant);
        }

        Ok(())
    }

    pub fn save(&self) -> LedgerResult<()> {
        let data = read_lock(&self.data)?;
        let mut participants: Vec<_> = data.values().cloned().collect();
        participants.sort_by(|a, b| {
            a.group_id
                .cmp(&b.group_id)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        write_json_atomic(&self.path, &ParticipantData { participants })
    }

    pub fn get(&self, id: ParticipantId) -> LedgerResult<Option<Participant>> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    pub fn get_all(&self) -> LedgerResult<Vec<Participant>> {
        let data = read_lock(&self.data)?;
        let mut participants: Vec<_> = data.values().cloned().collect();
        participants.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(participants)
    }

    /// Participants of a group in the order they joined
    pub fn get_by_group(&self, group_id: GroupId) -> LedgerResult<Vec<Participant>> {
        let data = read_lock(&self.data)?;
        let by_group = read_lock(&self.by_group)?;

        let mut participants: Vec<_> = by_group
            .get(&group_id)
            .map(|ids| ids.iter().filter_map(|id| data.get(id).cloned()).collect())
            .unwrap_or_default();
        participants.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(participants)
    }

    /// A group member by name (case-insensitive)
    pub fn get_by_name(&self, group_id: GroupId, name: &str) -> LedgerResult<Option<Participant>> {
        Ok(self
            .get_by_group(group_id)?
            .into_iter()
            .find(|p| p.matches_name(name)))
    }

    pub fn upsert(&self, participant: Participant) -> LedgerResult<()> {
        let mut data = write_lock(&self.data)?;
        let mut by_group = write_lock(&self.by_group)?;

        if let Some(old) = data.get(&participant.id) {
            if let Some(ids) = by_group.get_mut(&old.group_id) {
                ids.retain(|id| *id != participant.id);
            }
        }
        by_group
            .entry(participant.group_id)
            .or_default()
            .push(participant.id);

        data.insert(participant.id, participant);
        Ok(())
    }

    pub fn delete(&self, id: ParticipantId) -> LedgerResult<Option<Participant>> {
        let mut data = write_lock(&self.data)?;
        let mut by_group = write_lock(&self.by_group)?;

        let removed = data.remove(&id);
        if let Some(participant) = &removed {
            if let Some(ids) = by_group.get_mut(&participant.group_id) {
                ids.retain(|pid| *pid != id);
            }
        }
        Ok(removed)
    }

    /// Remove every participant of a group, returning what was removed
    pub fn delete_by_group(&self, group_id: GroupId) -> LedgerResult<Vec<Participant>> {
        let mut data = write_lock(&self.data)?;
        let mut by_group = write_lock(&self.by_group)?;

        let ids = by_group.remove(&group_id).unwrap_or_default();
        Ok(ids.iter().filter_map(|id| data.remove(id)).collect())
    }

    pub fn count(&self) -> LedgerResult<usize> {
        Ok(read_lock(&self.data)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ParticipantRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ParticipantRepository::new(temp_dir.path().join("participants.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_group_index_and_name_lookup() {
        let (_temp, repo) = create_test_repo();
        let trip = GroupId::new();
        let flat = GroupId::new();

        repo.upsert(Participant::new(trip, "Bob")).unwrap();
        repo.upsert(Participant::new(trip, "Carol")).unwrap();
        repo.upsert(Participant::new(flat, "Dave")).unwrap();

        assert_eq!(repo.get_by_group(trip).unwrap().len(), 2);
        assert!(repo.get_by_name(trip, "carol").unwrap().is_some());
        assert!(repo.get_by_name(flat, "carol").unwrap().is_none());
    }

    #[test]
    fn test_delete_by_group() {
        let (_temp, repo) = create_test_repo();
        let trip = GroupId::new();
        let other = GroupId::new();
        repo.upsert(Participant::new(trip, "Bob")).unwrap();
        repo.upsert(Participant::new(trip, "Carol")).unwrap();
        repo.upsert(Participant::new(other, "Dave")).unwrap();

        let removed = repo.delete_by_group(trip).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(repo.get_by_group(trip).unwrap().is_empty());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp, repo) = create_test_repo();
        let group = GroupId::new();
        let mut bob = Participant::new(group, "Bob");
        bob.color = Some("#336699".into());
        repo.upsert(bob.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = ParticipantRepository::new(temp.path().join("participants.json"));
        reloaded.load().unwrap();
        let loaded = reloaded.get(bob.id).unwrap().unwrap();
        assert_eq!(loaded.color.as_deref(), Some("#336699"));
        assert_eq!(reloaded.get_by_group(group).unwrap().len(), 1);
    }
}
