//! Audit logging for SplitLedger
//!
//! Every create, update and delete of a user, group, participant or expense is
//! appended to `audit.log` as one JSON object per line (JSONL). Updates carry
//! a short field-level diff so the log can be read without replaying JSON.
//!
//! ```rust,ignore
//! use splitledger::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Expense,
//!     expense.id.to_string(),
//!     Some(expense.description.clone()),
//!     &expense,
//! ))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
