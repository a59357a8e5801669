//! Export module for audit summaries
//!
//! Writes summary rows in machine-readable formats:
//! - CSV: one row per event (spreadsheet-compatible)
//! - JSON: rows wrapped with export metadata

pub mod csv;
pub mod json;

pub use self::csv::export_summary_csv;
pub use json::{export_summary_json, SummaryExport, EXPORT_SCHEMA_VERSION};
