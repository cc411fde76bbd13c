//! Export module for SplitLedger
//!
//! Provides complete data export functionality in two formats:
//! - CSV: expense rows with one row per split (spreadsheet-compatible)
//! - JSON: machine-readable full database export

pub mod csv;
pub mod json;

pub use self::csv::export_expenses_csv;
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
