//! SplitLedger - Terminal-based group expense splitting
//!
//! This library provides the core functionality for the SplitLedger
//! application: groups of people record shared expenses, the ledger engine
//! splits each expense, derives who owes whom, and suggests the transfers
//! that settle the group.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (users, groups, participants, expenses)
//! - `engine`: Split allocation, balances, settlements and totals
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `display`: Terminal tables
//! - `export`: JSON and CSV export
//! - `cli`: Command handlers for the `splitledger` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use splitledger::engine::{compute_balances, plan_settlements};
//!
//! let balances = compute_balances(&expenses, &participants, &owner);
//! for settlement in plan_settlements(&balances) {
//!     println!("{} -> {}: {}", settlement.from, settlement.to, settlement.amount);
//! }
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
