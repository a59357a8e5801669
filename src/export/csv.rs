//! CSV export of audit summaries

use std::io::Write;

use crate::engine::SummaryRow;
use crate::error::{OutreachError, OutreachResult};

const HEADER: [&str; 5] = ["When", "User", "Action", "Table", "Summary"];

/// Write summary rows as CSV with a header line
pub fn export_summary_csv<W: Write>(rows: &[SummaryRow], writer: W) -> OutreachResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    csv_writer.write_record(HEADER).map_err(export_error)?;
    for row in rows {
        csv_writer
            .write_record([&row.when, &row.user, &row.action, &row.table, &row.summary])
            .map_err(export_error)?;
    }

    csv_writer
        .flush()
        .map_err(|e| OutreachError::Export(e.to_string()))
}

fn export_error(err: ::csv::Error) -> OutreachError {
    OutreachError::Export(err.to_string())
}
