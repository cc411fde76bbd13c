//! Group model
//!
//! A group is owned by one user and holds up to three additional participants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, ParticipantId, UserId};

/// Maximum number of stored participants per group (the owner is not counted)
pub const MAX_PARTICIPANTS: usize = 3;

/// An expense-sharing group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: GroupId,

    /// Group name
    pub name: String,

    /// The owning user, who is an implicit member of the group
    pub owner_id: UserId,

    /// Stored participants, in the order they joined
    #[serde(default)]
    pub participant_ids: Vec<ParticipantId>,

    /// When the group was created
    pub created_at: DateTime<Utc>,

    /// When the group was last modified
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Create a new group
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: GroupId::new(),
            name: name.into(),
            owner_id,
            participant_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the given user owns this group
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Participant id under which the owner appears in balances
    pub fn owner_participant_id(&self) -> ParticipantId {
        ParticipantId::from_uuid(*self.owner_id.as_uuid())
    }

    /// Check whether an id belongs to a member (stored participant or owner)
    pub fn is_member(&self, id: ParticipantId) -> bool {
        id == self.owner_participant_id() || self.participant_ids.contains(&id)
    }

    /// Check whether another participant can join
    pub fn has_room(&self) -> bool {
        self.participant_ids.len() < MAX_PARTICIPANTS
    }

    /// Add a participant id
    pub fn add_participant(&mut self, id: ParticipantId) {
        if !self.participant_ids.contains(&id) {
            self.participant_ids.push(id);
            self.updated_at = Utc::now();
        }
    }

    /// Remove a participant id
    pub fn remove_participant(&mut self, id: ParticipantId) -> bool {
        let before = self.participant_ids.len();
        self.participant_ids.retain(|p| *p != id);
        let removed = self.participant_ids.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Rename the group
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Validate the group
    pub fn validate(&self) -> Result<(), GroupValidationError> {
        if self.name.trim().is_empty() {
            return Err(GroupValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(GroupValidationError::NameTooLong(self.name.len()));
        }

        if self.participant_ids.len() > MAX_PARTICIPANTS {
            return Err(GroupValidationError::TooManyParticipants(
                self.participant_ids.len(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    EmptyName,
    NameTooLong(usize),
    TooManyParticipants(usize),
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Group name is required"),
            Self::NameTooLong(len) => {
                write!(f, "Group name too long ({} chars, max 100)", len)
            }
            Self::TooManyParticipants(count) => write!(
                f,
                "Group has {} participants, maximum {} allowed",
                count, MAX_PARTICIPANTS
            ),
        }
    }
}

impl std::error::Error for GroupValidationError {}
