//! Service layer for SplitLedger
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, ownership checks, split computation, and audit logging.

pub mod balance;
pub mod expense;
pub mod group;
pub mod participant;
pub mod quick_entry;
pub mod user;

pub use balance::{BalanceReport, BalanceService};
pub use expense::{ExpenseService, ExpenseUpdate, NewExpense};
pub use group::GroupService;
pub use participant::{ParticipantService, ParticipantUpdate};
pub use quick_entry::{parse_expense_text, ParsedExpense};
pub use user::UserService;
