//! User model
//!
//! A user owns groups and takes part in every group they own as an implicit
//! participant that is never stored in the participant table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, ParticipantId, UserId};
use super::participant::Participant;

/// A local user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Optional contact email (unique when present)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new user with an email address
    pub fn with_email(name: impl Into<String>, email: impl Into<String>) -> Self {
        let mut user = Self::new(name);
        user.email = Some(email.into());
        user
    }

    /// The participant id this user carries inside their groups
    pub fn participant_id(&self) -> ParticipantId {
        ParticipantId::from_uuid(*self.id.as_uuid())
    }

    /// Build the synthetic participant standing in for this user in a group
    pub fn as_participant(&self, group_id: GroupId) -> Participant {
        let mut participant = Participant::new(group_id, self.name.clone());
        participant.id = self.participant_id();
        participant.created_at = self.created_at;
        participant
    }

    /// Validate the user
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(UserValidationError::NameTooLong(self.name.len()));
        }

        if let Some(email) = &self.email {
            let valid = email
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if !valid {
                return Err(UserValidationError::InvalidEmail(email.clone()));
            }
        }

        Ok(())
    }

    /// Normalize an email address for comparisons
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidEmail(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "User name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "User name too long ({} chars, max 50)", len)
            }
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
        }
    }
}

impl std::error::Error for UserValidationError {}
