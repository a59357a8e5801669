//! One-line audit summaries
//!
//! Each audit row is classified by its action label and rendered as a short
//! sentence. Every path ends in a string; unknown actions fall through to
//! progressively less specific descriptions.

use serde_json::Value;

use crate::display::preview::{PreviewFormatter, SessionTime};

use super::diff::{changed_fields, EqualityMode};
use super::event::{coerce_snapshot, ActionKind, AuditEvent};
use super::identity::identity;

/// Maximum number of changed fields named in an update summary
pub const MAX_LISTED_CHANGES: usize = 5;

/// Describes audit events for display
#[derive(Debug, Clone, Default)]
pub struct AuditSummarizer {
    preview: PreviewFormatter,
    equality: EqualityMode,
}

impl AuditSummarizer {
    /// Create a summarizer
    pub fn new(preview: PreviewFormatter, equality: EqualityMode) -> Self {
        Self { preview, equality }
    }

    /// The preview formatter used for fallbacks and timestamps
    pub fn preview(&self) -> &PreviewFormatter {
        &self.preview
    }

    /// Equality used when diffing updates
    pub fn equality(&self) -> EqualityMode {
        self.equality
    }

    /// Summarize an audit event on one line
    pub fn summarize(&self, event: &AuditEvent) -> String {
        let before = coerce_snapshot(&event.before);
        let after = coerce_snapshot(&event.after);
        let table = table_label(event);

        match event.kind() {
            ActionKind::Create => with_identity(format!("Created {}", table), identity(&after)),
            ActionKind::Update => describe_update(&self.changed_fields(event), table),
            ActionKind::Delete => with_identity(
                format!("Deleted {}", table),
                identity(&before).or_else(|| identity(&after)),
            ),
            ActionKind::Login => after
                .as_object()
                .and_then(|map| self.preview.session_time(map, SessionTime::Login))
                .unwrap_or_else(|| "User logged in".to_string()),
            ActionKind::Logout => "User logged out".to_string(),
            ActionKind::Deactivate => with_identity(
                format!("Deactivated {}", table),
                identity(&after).or_else(|| identity(&before)),
            ),
            ActionKind::Unknown => self.describe_unknown(event, &after),
        }
    }

    /// Changed field names for an update, empty when not comparable
    pub fn changed_fields(&self, event: &AuditEvent) -> Vec<String> {
        let before = coerce_snapshot(&event.before);
        let after = coerce_snapshot(&event.after);
        match (before.as_object(), after.as_object()) {
            (Some(before), Some(after)) => changed_fields(before, after, self.equality),
            _ => Vec::new(),
        }
    }

    fn describe_unknown(&self, event: &AuditEvent, after: &Value) -> String {
        let action = event.action.trim();
        if !action.is_empty() {
            return action.to_string();
        }

        let preview = self.preview.preview(after);
        if !preview.is_empty() {
            return preview;
        }

        event.table_name.trim().to_string()
    }
}

fn describe_update(changed: &[String], table: &str) -> String {
    if changed.is_empty() {
        return format!("Updated {}", table);
    }

    let listed: Vec<&str> = changed
        .iter()
        .take(MAX_LISTED_CHANGES)
        .map(String::as_str)
        .collect();
    format!("Updated {}", listed.join(", "))
}

fn table_label(event: &AuditEvent) -> &str {
    match event.table_name.trim() {
        "" => "record",
        table => table,
    }
}

fn with_identity(prefix: String, identity: Option<String>) -> String {
    match identity {
        Some(identity) => format!("{}: {}", prefix, identity),
        None => prefix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::timestamp::TimestampStyle;
    use serde_json::json;

    fn summarizer() -> AuditSummarizer {
        AuditSummarizer::new(
            PreviewFormatter::new(TimestampStyle::utc()),
            EqualityMode::Textual,
        )
    }

    fn summarize(action: &str, table: &str, before: Value, after: Value) -> String {
        summarizer().summarize(&AuditEvent::new(action, table, before, after))
    }

    #[test]
    fn test_create_with_identity() {
        assert_eq!(
            summarize("CREATE", "patients", json!(null), json!({"first_name": "Maria", "last_name": "Santos"})),
            "Created patients: Maria Santos"
        );
    }

    #[test]
    fn test_create_without_identity() {
        assert_eq!(
            summarize("create", "supplies", json!(null), json!({"quantity": 3})),
            "Created supplies"
        );
    }

    #[test]
    fn test_update_single_change() {
        assert_eq!(
            summarize(
                "UPDATE",
                "users",
                json!({"status": "Active", "city": "Manila"}),
                json!({"status": "Inactive", "city": "Manila"}),
            ),
            "Updated status"
        );
    }

    #[test]
    fn test_update_identical_snapshots() {
        let snapshot = json!({"status": "Active", "count": 3, "tags": ["a"]});
        assert_eq!(
            summarize("UPDATE", "users", snapshot.clone(), snapshot),
            "Updated users"
        );
    }

    #[test]
    fn test_update_caps_at_five_fields() {
        let before = json!({"a": 1, "b": 1, "c": 1, "d": 1, "e": 1, "f": 1, "g": 1});
        let after = json!({"a": 2, "b": 2, "c": 2, "d": 2, "e": 2, "f": 2, "g": 2});
        assert_eq!(summarize("UPDATE", "t", before, after), "Updated a, b, c, d, e");
    }

    #[test]
    fn test_update_non_map_snapshot() {
        assert_eq!(
            summarize("UPDATE", "schedules", json!("old"), json!({"date": "x"})),
            "Updated schedules"
        );
        assert_eq!(summarize("UPDATE", "", json!(null), json!(null)), "Updated record");
    }

    #[test]
    fn test_update_stringified_snapshots() {
        assert_eq!(
            summarize(
                "UPDATE",
                "inventory",
                json!(r#"{"quantity": 10}"#),
                json!(r#"{"quantity": 8}"#),
            ),
            "Updated quantity"
        );
    }

    #[test]
    fn test_update_textual_equality_hides_type_change() {
        let before = json!({"quantity": 1});
        let after = json!({"quantity": "1"});
        assert_eq!(
            summarize("UPDATE", "inventory", before.clone(), after.clone()),
            "Updated inventory"
        );

        let typed = AuditSummarizer::new(PreviewFormatter::default(), EqualityMode::Typed);
        assert_eq!(
            typed.summarize(&AuditEvent::new("UPDATE", "inventory", before, after)),
            "Updated quantity"
        );
    }

    #[test]
    fn test_delete_identity_fallback() {
        assert_eq!(
            summarize("DELETE", "users", json!({"username": "jdoe"}), json!(null)),
            "Deleted users: jdoe"
        );
        assert_eq!(
            summarize("DELETE", "users", json!(null), json!({"id": 8})),
            "Deleted users: 8"
        );
        assert_eq!(summarize("DELETE", "users", json!(null), json!(null)), "Deleted users");
    }

    #[test]
    fn test_login_with_time() {
        assert_eq!(
            summarize("LOGIN", "users", json!(null), json!({"login_time": "2025-10-25T14:07:45.867Z"})),
            "Login Time 10/25/2025, 2:07:45 PM"
        );
    }

    #[test]
    fn test_login_without_time() {
        assert_eq!(summarize("LOGIN", "users", json!(null), json!(null)), "User logged in");
        assert_eq!(
            summarize("USER_LOGIN", "users", json!(null), json!({"ip": "10.0.0.1"})),
            "User logged in"
        );
    }

    #[test]
    fn test_logout() {
        assert_eq!(
            summarize("LOGOUT", "users", json!(null), json!({"logout_time": "2025-10-25T18:00:00Z"})),
            "User logged out"
        );
    }

    #[test]
    fn test_deactivate_prefers_after() {
        assert_eq!(
            summarize("DISABLE_ACCOUNT", "users", json!({"username": "old"}), json!({"username": "new"})),
            "Deactivated users: new"
        );
        assert_eq!(
            summarize("DEACTIVATE", "users", json!({"username": "old"}), json!(null)),
            "Deactivated users: old"
        );
    }

    #[test]
    fn test_unknown_fallback_chain() {
        assert_eq!(summarize("EXPORT", "reports", json!(null), json!(null)), "EXPORT");
        assert_eq!(
            summarize("", "reports", json!(null), json!({"format": "pdf"})),
            "Format pdf"
        );
        assert_eq!(summarize("  ", "reports", json!(null), json!(null)), "reports");
        assert_eq!(summarize("", "", json!(null), json!(null)), "");
    }

    #[test]
    fn test_changed_fields_accessor() {
        let event = AuditEvent::new("UPDATE", "t", json!({"a": 1}), json!({"a": 2, "b": 1}));
        assert_eq!(summarizer().changed_fields(&event), vec!["a", "b"]);
    }
}
