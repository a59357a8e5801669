//! JSON export of audit summaries
//!
//! Wraps the rows with a schema version and export timestamp.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::SummaryRow;
use crate::error::{OutreachError, OutreachResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Audit summary export structure
#[derive(Debug, Clone, Serialize)]
pub struct SummaryExport<'a> {
    /// Schema version for compatibility checking
    pub schema_version: &'static str,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: &'static str,

    /// Number of exported events
    pub event_count: usize,

    /// Summary rows
    pub events: &'a [SummaryRow],
}

impl<'a> SummaryExport<'a> {
    /// Wrap rows for export
    pub fn new(events: &'a [SummaryRow]) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            event_count: events.len(),
            events,
        }
    }
}

/// Write summary rows as JSON
pub fn export_summary_json<W: Write>(
    rows: &[SummaryRow],
    writer: &mut W,
    pretty: bool,
) -> OutreachResult<()> {
    let export = SummaryExport::new(rows);

    let written = if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    };
    written.map_err(|e| OutreachError::Export(format!("Failed to serialize export: {}", e)))?;

    writeln!(writer).map_err(|e| OutreachError::Export(e.to_string()))
}
