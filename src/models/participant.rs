//! Participant model
//!
//! A participant is a named member of a single group who can pay for expenses
//! and be covered by them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, ParticipantId};

/// A named member of a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier
    pub id: ParticipantId,

    /// Display name
    pub name: String,

    /// The group this participant belongs to
    pub group_id: GroupId,

    /// Display color (`#rrggbb`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Avatar reference (emoji, initials or URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// When the participant was added
    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new participant
    pub fn new(group_id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.into(),
            group_id,
            color: None,
            avatar: None,
            created_at: Utc::now(),
        }
    }

    /// Color derived from the participant's id, used when none was chosen
    pub fn default_color(&self) -> String {
        let bytes = self.id.as_uuid().as_bytes();
        format!("#{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2])
    }

    /// Chosen color or the derived one
    pub fn display_color(&self) -> String {
        self.color.clone().unwrap_or_else(|| self.default_color())
    }

    /// Validate the participant
    pub fn validate(&self) -> Result<(), ParticipantValidationError> {
        if self.name.trim().is_empty() {
            return Err(ParticipantValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(ParticipantValidationError::NameTooLong(self.name.len()));
        }

        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(ParticipantValidationError::InvalidColor(color.clone()));
            }
        }

        Ok(())
    }

    /// Check if this participant matches a name (case-insensitive)
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#')
        .map(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for ParticipantValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Participant name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Participant name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(color) => {
                write!(f, "Invalid color '{}': expected #rrggbb", color)
            }
        }
    }
}

impl std::error::Error for ParticipantValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_color_is_stable() {
        let participant = Participant::new(GroupId::new(), "Bob");
        let color = participant.default_color();
        assert_eq!(color.len(), 7);
        assert!(color.starts_with('#'));
        assert_eq!(color, participant.default_color());
        assert_eq!(participant.display_color(), color);
    }

    #[test]
    fn test_validation() {
        let mut participant = Participant::new(GroupId::new(), "Bob");
        assert!(participant.validate().is_ok());

        participant.color = Some("#12ab9Z".into());
        assert!(matches!(
            participant.validate(),
            Err(ParticipantValidationError::InvalidColor(_))
        ));

        participant.color = Some("#12ab9f".into());
        assert!(participant.validate().is_ok());

        participant.name = "".into();
        assert_eq!(
            participant.validate(),
            Err(ParticipantValidationError::EmptyName)
        );
    }

    #[test]
    fn test_matches_name() {
        let participant = Participant::new(GroupId::new(), "Bob");
        assert!(participant.matches_name("bob"));
        assert!(participant.matches_name(" BOB "));
        assert!(!participant.matches_name("Bobby"));
    }
}
