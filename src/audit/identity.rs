//! Identity extraction
//!
//! Picks a short human-meaningful label for a record: a username, a name,
//! or failing those an id.

use serde_json::{Map, Value};

/// Extract the identity label of a snapshot
///
/// Preference: `username`, `name`, `first_name` + `last_name`, `id`,
/// `user_id`, `record_id`. A bare string snapshot is its own identity.
pub fn identity(value: &Value) -> Option<String> {
    match value {
        Value::Object(record) => record_identity(record),
        Value::String(s) => non_blank(s),
        _ => None,
    }
}

fn record_identity(record: &Map<String, Value>) -> Option<String> {
    field_text(record, "username")
        .or_else(|| field_text(record, "name"))
        .or_else(|| full_name(record))
        .or_else(|| field_text(record, "id"))
        .or_else(|| field_text(record, "user_id"))
        .or_else(|| field_text(record, "record_id"))
}

fn full_name(record: &Map<String, Value>) -> Option<String> {
    match (field_text(record, "first_name"), field_text(record, "last_name")) {
        (None, None) => None,
        (first, last) => non_blank(&format!(
            "{} {}",
            first.unwrap_or_default(),
            last.unwrap_or_default()
        )),
    }
}

fn field_text(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => non_blank(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
