//! Audit event data structures
//!
//! The backend's audit rows are loosely typed. `AuditEvent` picks out the
//! fields the summarizer needs and keeps the snapshots as raw JSON.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::display::preview::parse_container;
use crate::services::ValueNormalizer;

/// Kinds of audited actions, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
    Login,
    Logout,
    Deactivate,
    Unknown,
}

impl ActionKind {
    /// Classify a raw action label by case-insensitive substring match
    ///
    /// The first matching kind wins, so `UPDATE_AND_DELETE` is an update.
    pub fn classify(action: &str) -> Self {
        let action = action.to_uppercase();
        if action.contains("CREATE") {
            Self::Create
        } else if action.contains("UPDATE") {
            Self::Update
        } else if action.contains("DELETE") {
            Self::Delete
        } else if action.contains("LOGIN") {
            Self::Login
        } else if action.contains("LOGOUT") {
            Self::Logout
        } else if action.contains("DEACTIVATE") || action.contains("DISABLE") {
            Self::Deactivate
        } else {
            Self::Unknown
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Create => write!(f, "CREATE"),
            ActionKind::Update => write!(f, "UPDATE"),
            ActionKind::Delete => write!(f, "DELETE"),
            ActionKind::Login => write!(f, "LOGIN"),
            ActionKind::Logout => write!(f, "LOGOUT"),
            ActionKind::Deactivate => write!(f, "DEACTIVATE"),
            ActionKind::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

const ACTION_KEYS: &[&str] = &["action", "action_type", "event"];
const TABLE_KEYS: &[&str] = &["table_name", "table", "entity", "entity_type"];
const BEFORE_KEYS: &[&str] = &["before", "old_values", "old_data"];
const AFTER_KEYS: &[&str] = &["after", "new_values", "new_data"];
const USER_KEYS: &[&str] = &["username", "user", "performed_by", "user_id"];
const TIME_KEYS: &[&str] = &["created_at", "timestamp", "occurred_at"];

/// A single audit trail row
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditEvent {
    /// Row identifier, if the backend sent one
    #[serde(skip_serializing_if = "Value::is_null")]
    pub id: Value,

    /// Raw action label (e.g. "UPDATE_PATIENT")
    pub action: String,

    /// Table or entity the action touched
    pub table_name: String,

    /// Snapshot before the action; null when absent
    pub before: Value,

    /// Snapshot after the action; null when absent
    pub after: Value,

    /// Who performed the action
    #[serde(skip_serializing_if = "Value::is_null")]
    pub user: Value,

    /// When the action happened
    #[serde(skip_serializing_if = "Value::is_null")]
    pub occurred_at: Value,
}

impl AuditEvent {
    /// Create an event from its action, table and snapshots
    pub fn new(
        action: impl Into<String>,
        table_name: impl Into<String>,
        before: Value,
        after: Value,
    ) -> Self {
        Self {
            action: action.into(),
            table_name: table_name.into(),
            before,
            after,
            ..Self::default()
        }
    }

    /// Build an event from a backend record, tolerating common key variants
    pub fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            id: first_present(record, &["id", "log_id", "audit_id"]),
            action: text_of(&first_present(record, ACTION_KEYS)),
            table_name: text_of(&first_present(record, TABLE_KEYS)),
            before: first_present(record, BEFORE_KEYS),
            after: first_present(record, AFTER_KEYS),
            user: first_present(record, USER_KEYS),
            occurred_at: first_present(record, TIME_KEYS),
        }
    }

    /// Classified action kind
    pub fn kind(&self) -> ActionKind {
        ActionKind::classify(&self.action)
    }

    /// Resolve encrypted snapshots and encrypted fields inside them
    pub fn decode_snapshots<S: AsRef<str>>(mut self, normalizer: &ValueNormalizer<'_>, fields: &[S]) -> Self {
        self.before = decode_snapshot(&self.before, normalizer, fields);
        self.after = decode_snapshot(&self.after, normalizer, fields);
        self
    }
}

/// Interpret a snapshot that arrived as JSON text as structured data
pub fn coerce_snapshot(snapshot: &Value) -> Cow<'_, Value> {
    match snapshot {
        Value::String(s) => match parse_container(s) {
            Some(parsed) => Cow::Owned(parsed),
            None => Cow::Borrowed(snapshot),
        },
        other => Cow::Borrowed(other),
    }
}

fn decode_snapshot<S: AsRef<str>>(
    snapshot: &Value,
    normalizer: &ValueNormalizer<'_>,
    fields: &[S],
) -> Value {
    let decoded = normalizer.normalize_value(snapshot);
    let structured = coerce_snapshot(&decoded).into_owned();
    normalizer.normalize_records(&structured, fields)
}

fn first_present(record: &Map<String, Value>, keys: &[&str]) -> Value {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
