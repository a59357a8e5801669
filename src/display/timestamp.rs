//! Timestamp detection and localized rendering
//!
//! Audit payloads carry timestamps as RFC 3339 strings, naive
//! `YYYY-MM-DD HH:MM:SS` strings or epoch milliseconds. Rendering uses a
//! configurable strftime pattern in a fixed offset or the local zone.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::{OutreachError, OutreachResult};

/// Default pattern, close to an en-US locale string ("10/25/2025, 2:07:45 PM")
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a JSON value as a point in time
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => Utc.timestamp_millis_opt(n.as_i64()?).single(),
        _ => None,
    }
}

/// Parse a timestamp string; naive values are taken as UTC
pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

/// Check whether a string is an ISO-8601 date-time (`YYYY-MM-DDTHH:MM...`)
pub fn is_iso_timestamp(s: &str) -> bool {
    let s = s.trim();
    s.as_bytes().get(10) == Some(&b'T') && parse_timestamp_str(s).is_some()
}

/// Date-only portion of an ISO-8601 timestamp
pub fn date_portion(s: &str) -> &str {
    let s = s.trim();
    s.get(..10).unwrap_or(s)
}

/// How timestamps are rendered for display
#[derive(Debug, Clone)]
pub struct TimestampStyle {
    format: String,
    offset: Option<FixedOffset>,
}

impl TimestampStyle {
    /// Create a style from a strftime pattern and an optional UTC offset
    ///
    /// With no offset, timestamps render in the machine's local zone.
    pub fn new(format: impl Into<String>, utc_offset_minutes: Option<i32>) -> OutreachResult<Self> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(OutreachError::Config(format!(
                "Invalid timestamp format: '{}'",
                format
            )));
        }

        let offset = utc_offset_minutes
            .map(|minutes| {
                minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| {
                        OutreachError::Config(format!(
                            "UTC offset out of range: {} minutes",
                            minutes
                        ))
                    })
            })
            .transpose()?;

        Ok(Self { format, offset })
    }

    /// Default pattern rendered in UTC
    pub fn utc() -> Self {
        Self {
            format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            offset: FixedOffset::east_opt(0),
        }
    }

    /// Render a timestamp
    pub fn render(&self, timestamp: &DateTime<Utc>) -> String {
        match self.offset {
            Some(offset) => timestamp.with_timezone(&offset).format(&self.format).to_string(),
            None => timestamp.with_timezone(&Local).format(&self.format).to_string(),
        }
    }
}

impl Default for TimestampStyle {
    fn default() -> Self {
        Self {
            format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            offset: None,
        }
    }
}
