//! Expense model
//!
//! An expense is paid by one member of a group and covers a set of members,
//! each of whom carries a resolved split of the amount.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, GroupId, ParticipantId};
use super::money::Money;
use super::split::{Split, SplitData, SplitMode};

/// A shared expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// The group this expense belongs to
    pub group_id: GroupId,

    /// Total amount paid (always positive)
    pub amount: Money,

    /// What the money was spent on
    pub description: String,

    /// When the expense happened
    pub date: NaiveDate,

    /// Member who paid
    pub payer_id: ParticipantId,

    /// Members covered by the expense
    #[serde(default)]
    pub participant_ids: Vec<ParticipantId>,

    /// How the amount is divided
    #[serde(default)]
    pub split_mode: SplitMode,

    /// Custom amounts or percentages the splits were computed from
    #[serde(default, skip_serializing_if = "SplitData::is_empty")]
    pub split_data: SplitData,

    /// Resolved per-participant shares
    #[serde(default)]
    pub splits: Vec<Split>,

    /// When the expense was created
    pub created_at: DateTime<Utc>,

    /// When the expense was last modified
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense with no splits yet
    pub fn new(
        group_id: GroupId,
        amount: Money,
        description: impl Into<String>,
        date: NaiveDate,
        payer_id: ParticipantId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            group_id,
            amount,
            description: description.into(),
            date,
            payer_id,
            participant_ids: Vec::new(),
            split_mode: SplitMode::Equal,
            split_data: SplitData::none(),
            splits: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the covered participants and their resolved splits
    pub fn set_splits(
        &mut self,
        split_mode: SplitMode,
        participant_ids: Vec<ParticipantId>,
        splits: Vec<Split>,
    ) {
        self.split_mode = split_mode;
        self.participant_ids = participant_ids;
        self.splits = splits;
        self.touch();
    }

    /// Mark the expense as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Get the total of all splits (should equal the expense amount)
    pub fn splits_total(&self) -> Money {
        self.splits.iter().map(|s| s.amount).sum()
    }

    /// Get the split assigned to a participant, if any
    pub fn split_for(&self, participant_id: ParticipantId) -> Option<Money> {
        self.splits
            .iter()
            .find(|s| s.participant_id == participant_id)
            .map(|s| s.amount)
    }

    /// Check whether a participant paid for or is covered by this expense
    pub fn involves(&self, participant_id: ParticipantId) -> bool {
        self.payer_id == participant_id
            || self.participant_ids.contains(&participant_id)
            || self.splits.iter().any(|s| s.participant_id == participant_id)
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if !self.amount.is_within_limit() {
            return Err(ExpenseValidationError::AmountTooLarge(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }

        if self.participant_ids.is_empty() {
            return Err(ExpenseValidationError::NoParticipants);
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    EmptyDescription,
    NoParticipants,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive, got {}", amount)
            }
            Self::AmountTooLarge(amount) => write!(
                f,
                "Expense amount {} exceeds the maximum of {}",
                amount,
                Money::MAX_AMOUNT
            ),
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
            Self::NoParticipants => write!(f, "Expense must cover at least one participant"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
