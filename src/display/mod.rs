//! Display formatting for terminal output
//!
//! Fixed-width tables and detail views for groups, expenses and balances.
//! Every formatter takes the currency symbol from the user's settings.

pub mod balance;
pub mod expense;
pub mod group;

pub use balance::{format_balance_table, format_settlements, format_totals};
pub use expense::{format_expense_details, format_expense_list};
pub use group::{format_group_details, format_group_list, format_participant_list, GroupRow};

/// Width of the widest value in a column, never narrower than its header
pub(crate) fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
