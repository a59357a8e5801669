//! One-line previews of decoded values
//!
//! Previews are lossy and bounded. They never fail: an unexpected shape
//! degrades to a plain stringification.

use serde_json::{Map, Value};

use super::timestamp::{date_portion, is_iso_timestamp, parse_timestamp, TimestampStyle};

/// Maximum number of fields listed in a record preview
pub const MAX_PREVIEW_FIELDS: usize = 3;

/// Maximum characters shown for a single field value
pub const MAX_VALUE_CHARS: usize = 50;

/// Session timestamps that get a dedicated rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTime {
    Login,
    Logout,
}

impl SessionTime {
    fn key(&self) -> &'static str {
        match self {
            Self::Login => "logintime",
            Self::Logout => "logouttime",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Login => "Login Time",
            Self::Logout => "Logout Time",
        }
    }
}

/// Formats decoded values as short human-readable summaries
#[derive(Debug, Clone, Default)]
pub struct PreviewFormatter {
    timestamps: TimestampStyle,
}

impl PreviewFormatter {
    /// Create a formatter rendering timestamps with the given style
    pub fn new(timestamps: TimestampStyle) -> Self {
        Self { timestamps }
    }

    /// Timestamp style in use
    pub fn timestamps(&self) -> &TimestampStyle {
        &self.timestamps
    }

    /// Summarize a value on one line
    pub fn preview(&self, value: &Value) -> String {
        match value {
            Value::String(s) => match parse_container(s) {
                Some(parsed) => self.preview(&parsed),
                None => s.trim().to_string(),
            },
            Value::Object(map) => self
                .session_time(map, SessionTime::Login)
                .or_else(|| self.session_time(map, SessionTime::Logout))
                .or_else(|| field_summary(map))
                .unwrap_or_else(|| stringify(value)),
            other => stringify(other),
        }
    }

    /// Render `"<Label> <timestamp>"` if the record carries that session time
    ///
    /// Keys match regardless of case and separators, so `login_time`,
    /// `loginTime` and `Login Time` are all recognised.
    pub fn session_time(&self, map: &Map<String, Value>, which: SessionTime) -> Option<String> {
        map.iter()
            .filter(|(key, _)| compact_key(key) == which.key())
            .find_map(|(_, value)| parse_timestamp(value))
            .map(|ts| format!("{} {}", which.label(), self.timestamps.render(&ts)))
    }
}

/// Parse a string that holds a JSON object or array
pub fn parse_container(s: &str) -> Option<Value> {
    let trimmed = s.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    serde_json::from_str::<Value>(trimmed)
        .ok()
        .filter(|v| v.is_object() || v.is_array())
}

/// Turn a snake_case key into a title-cased label
pub fn format_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut at_word_start = true;

    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphanumeric() {
            if at_word_start {
                label.extend(c.to_uppercase());
            } else {
                label.push(c);
            }
            at_word_start = false;
        } else {
            label.push(c);
            at_word_start = true;
        }
    }

    label
}

/// Truncate to `max` characters, ending in `...` when shortened
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max <= 3 {
        ".".repeat(max)
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}

/// Render a value as plain text; null becomes an empty string
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compact_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_displayable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn format_field_value(value: &Value) -> String {
    let text = match value {
        Value::String(s) if is_iso_timestamp(s) => date_portion(s).to_string(),
        Value::String(s) => s.trim().to_string(),
        other => stringify(other),
    };
    truncate(&text, MAX_VALUE_CHARS)
}

fn field_summary(map: &Map<String, Value>) -> Option<String> {
    let parts: Vec<String> = map
        .iter()
        .filter(|(_, value)| is_displayable(value))
        .take(MAX_PREVIEW_FIELDS)
        .map(|(key, value)| format!("{} {}", format_label(key), format_field_value(value)))
        .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}
