//! Derived ledger records
//!
//! Balances, settlements and totals are computed from expenses on every query
//! and never persisted. Their monetary fields serialize as two-decimal numbers.

use serde::{Deserialize, Serialize};

use super::ids::ParticipantId;
use super::money::{self, Money};

/// A participant's net position in a group
///
/// Positive means the participant owes money into the group, negative means
/// money is owed to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    #[serde(with = "money::decimal")]
    pub net_balance: Money,
}

impl Balance {
    pub fn new(
        participant_id: ParticipantId,
        participant_name: impl Into<String>,
        net_balance: Money,
    ) -> Self {
        Self {
            participant_id,
            participant_name: participant_name.into(),
            net_balance,
        }
    }

    /// Zero cents left to settle
    pub fn is_settled(&self) -> bool {
        self.net_balance.is_zero()
    }

    pub fn owes(&self) -> bool {
        self.net_balance.is_positive()
    }

    pub fn is_owed(&self) -> bool {
        self.net_balance.is_negative()
    }
}

/// A single suggested transfer: `from` pays `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    #[serde(with = "money::decimal")]
    pub amount: Money,
}

impl Settlement {
    pub fn new(from: ParticipantId, to: ParticipantId, amount: Money) -> Self {
        Self { from, to, amount }
    }
}

/// Group-level totals from one user's point of view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotals {
    /// Sum of all expense amounts
    #[serde(with = "money::decimal")]
    pub total_spent: Money,
    /// What the user still owes (their positive balance)
    #[serde(with = "money::decimal")]
    pub total_owed: Money,
    /// What the group owes the user (magnitude of their negative balance)
    #[serde(with = "money::decimal")]
    pub total_owed_to_user: Money,
}
