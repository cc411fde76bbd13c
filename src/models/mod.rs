//! Core data models for SplitLedger
//!
//! This module contains the data structures of the expense-sharing domain:
//! users, groups, participants, expenses and their splits, plus the derived
//! balance and settlement records.

pub mod balance;
pub mod expense;
pub mod group;
pub mod ids;
pub mod money;
pub mod participant;
pub mod split;
pub mod user;

pub use balance::{Balance, GroupTotals, Settlement};
pub use expense::Expense;
pub use group::{Group, MAX_PARTICIPANTS};
pub use ids::{ExpenseId, GroupId, ParticipantId, UserId};
pub use money::Money;
pub use participant::Participant;
pub use split::{CustomAmount, Percentage, PercentageShare, Split, SplitData, SplitMode};
pub use user::User;
