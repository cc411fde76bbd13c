//! User service
//!
//! Local user profiles. A user owns groups and is the implicit extra member of
//! each of them.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, UserId};
use crate::storage::Storage;

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new user
    pub fn create(&self, name: &str, email: Option<&str>) -> LedgerResult<User> {
        let name = name.trim();
        let user = match email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => {
                if self.storage.users.email_exists(email, None)? {
                    return Err(LedgerError::Duplicate {
                        entity_type: "User",
                        identifier: email.to_string(),
                    });
                }
                User::with_email(name, User::normalize_email(email))
            }
            None => User::new(name),
        };

        user.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &user,
        )?;

        Ok(user)
    }

    pub fn get(&self, id: UserId) -> LedgerResult<Option<User>> {
        self.storage.users.get(id)
    }

    /// Get a user by ID, failing if it does not exist
    pub fn require(&self, id: UserId) -> LedgerResult<User> {
        self.get(id)?
            .ok_or_else(|| LedgerError::user_not_found(id.to_string()))
    }

    /// Find a user by name, email or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<User>> {
        if let Some(user) = self.storage.users.get_by_name(identifier)? {
            return Ok(Some(user));
        }

        if identifier.contains('@') {
            return self.storage.users.get_by_email(identifier);
        }

        Ok(self
            .storage
            .users
            .get_all()?
            .into_iter()
            .find(|u| u.id.matches(identifier)))
    }

    pub fn list(&self) -> LedgerResult<Vec<User>> {
        self.storage.users.get_all()
    }
}
