//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod balance;
pub mod expense;
pub mod export;
pub mod group;
pub mod participant;
pub mod user;

pub use audit::handle_audit_command;
pub use balance::{handle_balance_command, BalanceCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use group::{handle_group_command, GroupCommands};
pub use participant::{handle_participant_command, ParticipantCommands};
pub use user::{handle_user_command, UserCommands};

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Group, Money};
use crate::services::GroupService;
use crate::storage::Storage;

/// Resolve a group owned by the active user
pub(crate) fn resolve_group(
    storage: &Storage,
    settings: &Settings,
    identifier: &str,
) -> LedgerResult<Group> {
    let owner_id = settings.require_active_user()?;
    GroupService::new(storage).require(owner_id, identifier)
}

/// Parse a positive amount such as "12.50" or "$12.50"
pub(crate) fn parse_amount(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount: '{}'. Use format like '12.50'. Error: {}",
            input, e
        ))
    })
}

/// Parse a date in YYYY-MM-DD format
pub(crate) fn parse_date(input: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!(
            "Invalid date: '{}'. Use format YYYY-MM-DD",
            input
        ))
    })
}
