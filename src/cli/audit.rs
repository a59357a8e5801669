//! Audit trail command
//!
//! Reads an audit export, decodes snapshots and prints one summary per event.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::audit::AuditReader;
use crate::display::format_audit_table;
use crate::engine::{Engine, SummaryRow};
use crate::error::{OutreachError, OutreachResult};
use crate::export::{export_summary_csv, export_summary_json};

/// Output format options
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum AuditFormat {
    /// Aligned table
    #[default]
    Table,
    /// CSV with a header line
    Csv,
    /// JSON with export metadata and per-field changes
    Json,
}

/// Arguments for `outreach audit`
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Audit export (JSON array, wrapped response or JSONL)
    pub file: PathBuf,

    /// Only show the most recent N events
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: AuditFormat,
}

/// Handle the audit command
pub fn handle_audit_command(engine: &Engine, args: AuditArgs) -> OutreachResult<()> {
    let reader = AuditReader::new(args.file).with_decoder(engine.decoder());
    let events = match args.limit {
        Some(count) => reader.read_recent(count)?,
        None => reader.read_all()?,
    };

    let rows: Vec<SummaryRow> = events
        .into_iter()
        .map(|event| engine.summary_row(event))
        .collect();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        AuditFormat::Table => {
            writeln!(out, "{}", format_audit_table(&rows))
                .map_err(|e| OutreachError::Io(e.to_string()))?;
        }
        AuditFormat::Csv => export_summary_csv(&rows, &mut out)?,
        AuditFormat::Json => export_summary_json(&rows, &mut out, true)?,
    }

    Ok(())
}
