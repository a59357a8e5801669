//! Audit trail display formatting
//!
//! Formats summary rows for terminal output as an aligned table.

use crate::engine::SummaryRow;

/// Format audit summary rows as a table
pub fn format_audit_table(rows: &[SummaryRow]) -> String {
    if rows.is_empty() {
        return "No audit events found.".to_string();
    }

    let when_width = column_width(rows, "When", |r| &r.when);
    let user_width = column_width(rows, "User", |r| &r.user);
    let action_width = column_width(rows, "Action", |r| &r.action);
    let table_width = column_width(rows, "Table", |r| &r.table);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<when_width$}  {:<user_width$}  {:<action_width$}  {:<table_width$}  {}\n",
        "When",
        "User",
        "Action",
        "Table",
        "Summary",
    ));

    output.push_str(&format!(
        "{:-<when_width$}  {:-<user_width$}  {:-<action_width$}  {:-<table_width$}  {:-<20}\n",
        "", "", "", "", "",
    ));

    for row in rows {
        output.push_str(&format!(
            "{:<when_width$}  {:<user_width$}  {:<action_width$}  {:<table_width$}  {}\n",
            row.when, row.user, row.action, row.table, row.summary,
        ));
    }

    output.push_str(&format!("\n{} event(s)\n", rows.len()));
    output
}

fn column_width<F>(rows: &[SummaryRow], header: &str, field: F) -> usize
where
    F: Fn(&SummaryRow) -> &String,
{
    rows.iter()
        .map(|r| field(r).chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
