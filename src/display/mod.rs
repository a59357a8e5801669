//! Display formatting for terminal output
//!
//! Provides previews of decoded values, timestamp rendering and the audit
//! summary table.

pub mod audit;
pub mod preview;
pub mod timestamp;

pub use audit::format_audit_table;
pub use preview::{format_label, PreviewFormatter, SessionTime};
pub use timestamp::{TimestampStyle, DEFAULT_TIMESTAMP_FORMAT};
