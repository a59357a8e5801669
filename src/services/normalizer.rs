//! Field normalization service
//!
//! List responses often carry individually encrypted fields (names, emails)
//! even when the response body itself is plaintext. The normalizer decodes
//! those fields in place and leaves anything it cannot decode untouched, so
//! a single corrupt field never breaks rendering of a whole list.

use serde_json::{Map, Value};

use crate::crypto::{looks_like_envelope, EnvelopeDecoder};
use crate::error::DecodeError;

/// Outcome of normalizing a single string field
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// The field was an envelope and decoded cleanly
    Decoded(Value),
    /// The field does not look like an envelope
    Plain(String),
    /// The field looked like an envelope but did not decode
    Miss { raw: String, error: DecodeError },
}

impl Normalized {
    /// Collapse the outcome to the value a caller should display
    pub fn into_value(self) -> Value {
        match self {
            Self::Decoded(value) => value,
            Self::Plain(raw) | Self::Miss { raw, .. } => Value::String(raw),
        }
    }
}

/// Service for decoding independently encrypted record fields
pub struct ValueNormalizer<'a> {
    decoder: &'a EnvelopeDecoder,
}

impl<'a> ValueNormalizer<'a> {
    /// Create a new normalizer backed by a decoder
    pub fn new(decoder: &'a EnvelopeDecoder) -> Self {
        Self { decoder }
    }

    /// Normalize a single raw string, reporting which branch was taken
    pub fn try_normalize_field(&self, raw: &str) -> Normalized {
        if !looks_like_envelope(raw) {
            return Normalized::Plain(raw.to_string());
        }

        match self.decoder.decode(raw) {
            Ok(value) => Normalized::Decoded(value),
            Err(error) => {
                tracing::debug!(%error, "field looked like an envelope but did not decode");
                Normalized::Miss {
                    raw: raw.to_string(),
                    error,
                }
            }
        }
    }

    /// Normalize a single raw string, falling back to the raw value
    pub fn normalize_field(&self, raw: &str) -> Value {
        self.try_normalize_field(raw).into_value()
    }

    /// Normalize a value if it is a string, otherwise return a copy
    pub fn normalize_value(&self, value: &Value) -> Value {
        match value {
            Value::String(raw) => self.normalize_field(raw),
            other => other.clone(),
        }
    }

    /// Return a shallow copy of a record with the named fields normalized
    ///
    /// Fields that are missing or not strings pass through unchanged.
    pub fn normalize_record<S: AsRef<str>>(
        &self,
        record: &Map<String, Value>,
        fields: &[S],
    ) -> Map<String, Value> {
        let mut normalized = record.clone();

        for field in fields {
            let field = field.as_ref();
            if let Some(Value::String(raw)) = record.get(field) {
                normalized.insert(field.to_string(), self.normalize_field(raw));
            }
        }

        normalized
    }

    /// Normalize a record or a list of records
    ///
    /// Non-record values are returned unchanged.
    pub fn normalize_records<S: AsRef<str>>(&self, rows: &Value, fields: &[S]) -> Value {
        match rows {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.normalize_records(item, fields))
                    .collect(),
            ),
            Value::Object(record) => Value::Object(self.normalize_record(record, fields)),
            other => other.clone(),
        }
    }
}
