//! Group repository for JSON storage
//!
//! Manages loading and saving groups to groups.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerResult;
use crate::models::{Group, GroupId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GroupData {
    groups: Vec<Group>,
}

/// Repository for group persistence with an owner index
pub struct GroupRepository {
    path: PathBuf,
    data: RwLock<HashMap<GroupId, Group>>,
    /// Index: owner -> group_ids
    by_owner: RwLock<HashMap<UserId, Vec<GroupId>>>,
}

impl GroupRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_owner: RwLock::new(HashMap::new()),
        }
    }

    /// Load groups from disk and rebuild the owner index
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: GroupData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        let mut by_owner = write_lock(&self.by_owner)?;
        data.clear();
        by_owner.clear();

        for group in file_data.groups {
            by_owner.entry(group.owner_id).or_default().push(group.id);
            data.insert(group.id, group);
        }

        Ok(())
    }

    pub fn save(&self) -> LedgerResult<()> {
        let groups = self.get_all()?;
        write_json_atomic(&self.path, &GroupData { groups })
    }

    pub fn get(&self, id: GroupId) -> LedgerResult<Option<Group>> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All groups in creation order
    pub fn get_all(&self) -> LedgerResult<Vec<Group>> {
        let data = read_lock(&self.data)?;
        let mut groups: Vec<_> = data.values().cloned().collect();
        sort_groups(&mut groups);
        Ok(groups)
    }

    /// Groups owned by a user, oldest first
    pub fn get_by_owner(&self, owner_id: UserId) -> LedgerResult<Vec<Group>> {
        let data = read_lock(&self.data)?;
        let by_owner = read_lock(&self.by_owner)?;

        let mut groups: Vec<_> = by_owner
            .get(&owner_id)
            .map(|ids| ids.iter().filter_map(|id| data.get(id).cloned()).collect())
            .unwrap_or_default();
        sort_groups(&mut groups);
        Ok(groups)
    }

    /// A user's group by name (case-insensitive)
    pub fn get_by_name(&self, owner_id: UserId, name: &str) -> LedgerResult<Option<Group>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .get_by_owner(owner_id)?
            .into_iter()
            .find(|g| g.name.to_lowercase() == wanted))
    }

    /// Insert or update a group
    pub fn upsert(&self, group: Group) -> LedgerResult<()> {
        let mut data = write_lock(&self.data)?;
        let mut by_owner = write_lock(&self.by_owner)?;

        if let Some(old) = data.get(&group.id) {
            if let Some(ids) = by_owner.get_mut(&old.owner_id) {
                ids.retain(|id| *id != group.id);
            }
        }
        by_owner.entry(group.owner_id).or_default().push(group.id);

        data.insert(group.id, group);
        Ok(())
    }

    pub fn delete(&self, id: GroupId) -> LedgerResult<Option<Group>> {
        let mut data = write_lock(&self.data)?;
        let mut by_owner = write_lock(&self.by_owner)?;

        let removed = data.remove(&id);
        if let Some(group) = &removed {
            if let Some(ids) = by_owner.get_mut(&group.owner_id) {
                ids.retain(|gid| *gid != id);
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> LedgerResult<usize> {
        Ok(read_lock(&self.data)?.len())
    }
}

fn sort_groups(groups: &mut [Group]) {
    groups.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, GroupRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = GroupRepository::new(temp_dir.path().join("groups.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_owner_index() {
        let (_temp, repo) = create_test_repo();
        let alice = UserId::new();
        let bob = UserId::new();

        repo.upsert(Group::new("Trip", alice)).unwrap();
        repo.upsert(Group::new("Flat", alice)).unwrap();
        repo.upsert(Group::new("Club", bob)).unwrap();

        assert_eq!(repo.get_by_owner(alice).unwrap().len(), 2);
        assert_eq!(repo.get_by_owner(bob).unwrap().len(), 1);
        assert!(repo.get_by_name(alice, "trip").unwrap().is_some());
        assert!(repo.get_by_name(bob, "Trip").unwrap().is_none());
    }

    #[test]
    fn test_upsert_does_not_duplicate_index() {
        let (_temp, repo) = create_test_repo();
        let owner = UserId::new();
        let mut group = Group::new("Trip", owner);
        repo.upsert(group.clone()).unwrap();
        group.rename("Road trip");
        repo.upsert(group.clone()).unwrap();

        let owned = repo.get_by_owner(owner).unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].name, "Road trip");
    }

    #[test]
    fn test_save_reload_delete() {
        let (temp, repo) = create_test_repo();
        let owner = UserId::new();
        let group = Group::new("Trip", owner);
        repo.upsert(group.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = GroupRepository::new(temp.path().join("groups.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);

        assert!(reloaded.delete(group.id).unwrap().is_some());
        assert!(reloaded.get_by_owner(owner).unwrap().is_empty());
        assert!(reloaded.delete(group.id).unwrap().is_none());
    }
}
