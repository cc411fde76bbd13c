//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerResult;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
    /// Index: normalized email -> user_id
    by_email: RwLock<HashMap<String, UserId>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_email: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk and rebuild the email index
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        let mut by_email = write_lock(&self.by_email)?;
        data.clear();
        by_email.clear();

        for user in file_data.users {
            if let Some(email) = &user.email {
                by_email.insert(User::normalize_email(email), user.id);
            }
            data.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk, oldest first
    pub fn save(&self) -> LedgerResult<()> {
        let users = self.get_all()?;
        write_json_atomic(&self.path, &UserData { users })
    }

    pub fn get(&self, id: UserId) -> LedgerResult<Option<User>> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All users in creation order
    pub fn get_all(&self) -> LedgerResult<Vec<User>> {
        let data = read_lock(&self.data)?;
        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        Ok(users)
    }

    pub fn get_by_email(&self, email: &str) -> LedgerResult<Option<User>> {
        let by_email = read_lock(&self.by_email)?;
        match by_email.get(&User::normalize_email(email)) {
            Some(id) => self.get(*id),
            None => Ok(None),
        }
    }

    /// First user whose name matches, case-insensitively
    pub fn get_by_name(&self, name: &str) -> LedgerResult<Option<User>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .get_all()?
            .into_iter()
            .find(|u| u.name.to_lowercase() == wanted))
    }

    /// Check whether an email is taken by someone other than `exclude`
    pub fn email_exists(&self, email: &str, exclude: Option<UserId>) -> LedgerResult<bool> {
        let by_email = read_lock(&self.by_email)?;
        Ok(by_email
            .get(&User::normalize_email(email))
            .is_some_and(|id| Some(*id) != exclude))
    }

    /// Insert or update a user
    pub fn upsert(&self, user: User) -> LedgerResult<()> {
        let mut data = write_lock(&self.data)?;
        let mut by_email = write_lock(&self.by_email)?;

        if let Some(old_email) = data.get(&user.id).and_then(|old| old.email.clone()) {
            by_email.remove(&User::normalize_email(&old_email));
        }
        if let Some(email) = &user.email {
            by_email.insert(User::normalize_email(email), user.id);
        }

        data.insert(user.id, user);
        Ok(())
    }

    pub fn delete(&self, id: UserId) -> LedgerResult<bool> {
        let mut data = write_lock(&self.data)?;
        let mut by_email = write_lock(&self.by_email)?;

        match data.remove(&id) {
            Some(user) => {
                if let Some(email) = &user.email {
                    by_email.remove(&User::normalize_email(email));
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn count(&self) -> LedgerResult<usize> {
        Ok(read_lock(&self.data)?.len())
    }
}
