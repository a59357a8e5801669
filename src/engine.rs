//! Decoding engine
//!
//! Bundles a decoder built from the shared secret with the summarizer and
//! field list from settings, and turns audit events into display rows.

use serde::Serialize;
use serde_json::Value;

use crate::audit::{describe_changes, identity, ActionKind, AuditEvent, AuditSummarizer};
use crate::config::Settings;
use crate::crypto::{EnvelopeDecoder, SharedSecret};
use crate::display::preview::stringify;
use crate::display::timestamp::parse_timestamp;
use crate::error::OutreachResult;
use crate::services::{PageResponse, ValueNormalizer};

/// One rendered audit trail row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub when: String,
    pub user: String,
    pub action: String,
    pub table: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
}

/// Decoder, normalizer and summarizer configured together
#[derive(Debug, Clone)]
pub struct Engine {
    decoder: EnvelopeDecoder,
    summarizer: AuditSummarizer,
    encrypted_fields: Vec<String>,
}

impl Engine {
    /// Build an engine from a shared secret and settings
    pub fn new(secret: SharedSecret, settings: &Settings) -> OutreachResult<Self> {
        Ok(Self {
            decoder: EnvelopeDecoder::new(secret),
            summarizer: settings.summarizer()?,
            encrypted_fields: settings.encrypted_fields.clone(),
        })
    }

    /// The envelope decoder
    pub fn decoder(&self) -> &EnvelopeDecoder {
        &self.decoder
    }

    /// A field normalizer backed by this engine's decoder
    pub fn normalizer(&self) -> ValueNormalizer<'_> {
        ValueNormalizer::new(&self.decoder)
    }

    /// The audit summarizer
    pub fn summarizer(&self) -> &AuditSummarizer {
        &self.summarizer
    }

    /// Fields decoded individually inside records
    pub fn encrypted_fields(&self) -> &[String] {
        &self.encrypted_fields
    }

    /// Open a list response, falling back to plaintext if the body will not decode
    pub fn open_page(&self, raw: Value) -> PageResponse {
        match PageResponse::open(raw.clone(), &self.decoder) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(error = %e, "response body did not decode; treating as plaintext");
                PageResponse::plaintext(raw)
            }
        }
    }

    /// Decode a payload's records in place
    pub fn normalize_payload(&self, payload: &Value) -> Value {
        self.normalizer()
            .normalize_records(payload, &self.encrypted_fields)
    }

    /// Decode an event's snapshots and render it as a display row
    pub fn summary_row(&self, event: AuditEvent) -> SummaryRow {
        let normalizer = self.normalizer();
        let event = event.decode_snapshots(&normalizer, &self.encrypted_fields);

        let changes = match (event.kind(), event.before.as_object(), event.after.as_object()) {
            (ActionKind::Update, Some(before), Some(after)) => {
                describe_changes(before, after, self.summarizer.equality())
            }
            _ => Vec::new(),
        };

        let user = normalizer.normalize_value(&event.user);
        let when = match parse_timestamp(&event.occurred_at) {
            Some(ts) => self.summarizer.preview().timestamps().render(&ts),
            None => stringify(&event.occurred_at),
        };

        SummaryRow {
            when,
            user: identity(&user).unwrap_or_else(|| stringify(&user)),
            action: event.action.clone(),
            table: event.table_name.clone(),
            summary: self.summarizer.summarize(&event),
            changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::EqualityMode;
    use crate::crypto::CipherEncoding;
    use serde_json::json;

    fn test_engine() -> Engine {
        let settings = Settings {
            utc_offset_minutes: Some(0),
            ..Settings::default()
        };
        Engine::new(SharedSecret::new("0123456789abcdef").unwrap(), &settings).unwrap()
    }

    #[test]
    fn test_summary_row_with_encrypted_snapshots() {
        let engine = test_engine();
        let before = engine
            .decoder()
            .seal(&json!({"status": "Active", "city": "Manila"}), CipherEncoding::Hex)
            .unwrap();
        let after = engine
            .decoder()
            .seal(&json!({"status": "Inactive", "city": "Manila"}), CipherEncoding::Base64)
            .unwrap();
        let record = json!({
            "action": "UPDATE",
            "table_name": "users",
            "old_values": before,
            "new_values": after,
            "username": engine.decoder().seal(&json!("admin"), CipherEncoding::Hex).unwrap(),
            "created_at": "2025-10-25T14:07:45Z",
        });

        let row = engine.summary_row(AuditEvent::from_record(record.as_object().unwrap()));
        assert_eq!(row.summary, "Updated status");
        assert_eq!(row.user, "admin");
        assert_eq!(row.when, "10/25/2025, 2:07:45 PM");
        assert_eq!(row.changes, vec!["status: \"Active\" -> \"Inactive\""]);
    }

    #[test]
    fn test_summary_row_user_object() {
        let engine = test_engine();
        let event = AuditEvent {
            user: json!({"first_name": "Ana", "last_name": "Reyes"}),
            ..AuditEvent::new("LOGOUT", "users", json!(null), json!(null))
        };

        let row = engine.summary_row(event);
        assert_eq!(row.user, "Ana Reyes");
        assert_eq!(row.summary, "User logged out");
        assert!(row.changes.is_empty());
        assert_eq!(row.when, "");
    }

    #[test]
    fn test_open_page_plaintext_fallback() {
        let engine = test_engine();
        let page = engine.open_page(json!({"data": "not:an-envelope", "total": 3}));
        assert_eq!(page.payload, json!("not:an-envelope"));
        assert_eq!(page.explicit_total(), Some(3));
    }

    #[test]
    fn test_normalize_payload() {
        let engine = test_engine();
        let name = engine.decoder().seal(&json!("Maria"), CipherEncoding::Hex).unwrap();
        let payload = json!([{"first_name": name, "age": 30}]);

        assert_eq!(
            engine.normalize_payload(&payload),
            json!([{"first_name": "Maria", "age": 30}])
        );
    }

    #[test]
    fn test_engine_uses_settings_equality() {
        let settings = Settings {
            diff_equality: EqualityMode::Typed,
            ..Settings::default()
        };
        let engine = Engine::new(SharedSecret::new("0123456789abcdef").unwrap(), &settings).unwrap();
        assert_eq!(engine.summarizer().equality(), EqualityMode::Typed);
    }
}
