//! Audit trail reader
//!
//! Loads audit rows exported from the backend. Accepts a JSON array, a
//! wrapped response (`{"data": [...]}`, possibly with an encrypted `data`
//! envelope) or line-delimited JSON (JSONL) with one row per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use serde_json::Value;

use crate::crypto::EnvelopeDecoder;
use crate::error::{OutreachError, OutreachResult};
use crate::services::totals::page_rows;

use super::event::AuditEvent;

/// Reads audit events from an exported file
pub struct AuditReader<'a> {
    /// Path to the export
    path: PathBuf,
    /// Decoder for encrypted response bodies
    decoder: Option<&'a EnvelopeDecoder>,
}

impl<'a> AuditReader<'a> {
    /// Create a reader for a plaintext export
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            decoder: None,
        }
    }

    /// Decode an encrypted response body with the given decoder
    pub fn with_decoder(mut self, decoder: &'a EnvelopeDecoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Read all audit events, in file order
    pub fn read_all(&self) -> OutreachResult<Vec<AuditEvent>> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            OutreachError::Io(format!(
                "Failed to read audit export {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let rows = match serde_json::from_str::<Value>(&contents) {
            Ok(document) => self.rows_of_document(document)?,
            Err(_) => self.read_lines()?,
        };

        Ok(rows_to_events(rows))
    }

    /// Read the most recent N events
    pub fn read_recent(&self, count: usize) -> OutreachResult<Vec<AuditEvent>> {
        let all_events = self.read_all()?;
        let start = all_events.len().saturating_sub(count);
        Ok(all_events[start..].to_vec())
    }

    /// Get the path to the export
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn rows_of_document(&self, document: Value) -> OutreachResult<Vec<Value>> {
        let payload = match (self.decoder, has_envelope_body(&document)) {
            (Some(decoder), _) => decoder.open_response(&document)?,
            (None, true) => {
                return Err(OutreachError::Validation(
                    "Audit export is encrypted; a shared secret is required".into(),
                ))
            }
            (None, false) => document,
        };

        match payload {
            Value::Array(rows) => Ok(rows),
            Value::Object(_) => Ok(page_rows(&payload)
                .cloned()
                .unwrap_or_else(|| vec![payload.clone()])),
            other => Err(OutreachError::Validation(format!(
                "Audit export must hold a list of rows, found {}",
                other
            ))),
        }
    }

    fn read_lines(&self) -> OutreachResult<Vec<Value>> {
        let file = File::open(&self.path)
            .map_err(|e| OutreachError::Io(format!("Failed to open audit export: {}", e)))?;

        let reader = BufReader::new(file);
        let mut rows = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                OutreachError::Io(format!(
                    "Failed to read audit export line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            // Skip empty lines
            if line.trim().is_empty() {
                continue;
            }

            let row: Value = serde_json::from_str(&line).map_err(|e| {
                OutreachError::Json(format!(
                    "Failed to parse audit row at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            rows.push(row);
        }

        Ok(rows)
    }
}

fn has_envelope_body(document: &Value) -> bool {
    document
        .get("data")
        .or_else(|| document.get("payload"))
        .is_some_and(Value::is_string)
}

fn rows_to_events(rows: Vec<Value>) -> Vec<AuditEvent> {
    rows.iter()
        .filter_map(|row| match row.as_object() {
            Some(record) => Some(AuditEvent::from_record(record)),
            None => {
                tracing::warn!("skipping audit row that is not an object");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{CipherEncoding, SharedSecret};
    use serde_json::json;
    use tempfile::TempDir;

    fn write_export(contents: &str) -> (PathBuf, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audit.json");
        std::fs::write(&path, contents).unwrap();
        (path, temp_dir)
    }

    #[test]
    fn test_read_array() {
        let (path, _temp) = write_export(
            &json!([
                {"action": "CREATE", "table_name": "patients"},
                {"action": "DELETE", "table_name": "supplies"},
            ])
            .to_string(),
        );

        let events = AuditReader::new(path).read_all().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].table_name, "supplies");
    }

    #[test]
    fn test_read_wrapped_response() {
        let (path, _temp) = write_export(
            &json!({"success": true, "data": [{"action": "LOGIN"}], "total": 1}).to_string(),
        );

        let events = AuditReader::new(path).read_all().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, "LOGIN");
    }

    #[test]
    fn test_read_jsonl() {
        let contents = "{\"action\": \"CREATE\"}\n\n{\"action\": \"UPDATE\"}\n";
        let (path, _temp) = write_export(contents);

        let events = AuditReader::new(path).read_all().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].action, "UPDATE");
    }

    #[test]
    fn test_read_jsonl_bad_line() {
        let (path, _temp) = write_export("{\"action\": \"CREATE\"}\nnot json\n");

        let err = AuditReader::new(path).read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_read_encrypted_response() {
        let decoder = EnvelopeDecoder::new(SharedSecret::new("0123456789abcdef").unwrap());
        let envelope = decoder
            .seal(&json!([{"action": "LOGOUT"}]), CipherEncoding::Hex)
            .unwrap();
        let (path, _temp) = write_export(&json!({"data": envelope}).to_string());

        let plain_err = AuditReader::new(path.clone()).read_all().unwrap_err();
        assert!(plain_err.is_validation());

        let events = AuditReader::new(path).with_decoder(&decoder).read_all().unwrap();
        assert_eq!(events[0].action, "LOGOUT");
    }

    #[test]
    fn test_read_recent() {
        let rows: Vec<Value> = (0..10)
            .map(|i| json!({"action": "UPDATE", "id": i}))
            .collect();
        let (path, _temp) = write_export(&Value::Array(rows).to_string());

        let recent = AuditReader::new(path).read_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, json!(7));
        assert_eq!(recent[2].id, json!(9));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AuditReader::new(temp_dir.path().join("nope.json"));
        assert!(matches!(reader.read_all().unwrap_err(), OutreachError::Io(_)));
    }
}
