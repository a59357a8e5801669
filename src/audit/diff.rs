//! Diff generation for audit summaries
//!
//! Compares before/after snapshots field by field. Equality is textual by
//! default: two values are the same when they render to the same text, so
//! `1` and `"1"` do not count as a change. `EqualityMode::Typed` compares
//! the JSON values structurally instead.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::display::preview::truncate;

/// How field values are compared when diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EqualityMode {
    /// Equal iff the rendered text is equal
    #[default]
    Textual,
    /// Equal iff the JSON values are equal
    Typed,
}

impl EqualityMode {
    /// Compare two possibly-missing field values
    pub fn equal(&self, a: Option<&Value>, b: Option<&Value>) -> bool {
        match self {
            Self::Textual => a.map(render_text) == b.map(render_text),
            Self::Typed => a == b,
        }
    }
}

/// Keys whose values differ between two snapshots
///
/// Keys of `before` come first in their original order, followed by keys
/// only present in `after`.
pub fn changed_fields(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    mode: EqualityMode,
) -> Vec<String> {
    before
        .keys()
        .chain(after.keys().filter(|key| !before.contains_key(*key)))
        .filter(|key| !mode.equal(before.get(*key), after.get(*key)))
        .cloned()
        .collect()
}

/// Describe each changed field as `key: old -> new`
///
/// More verbose than the one-line summary, used for detailed exports.
pub fn describe_changes(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    mode: EqualityMode,
) -> Vec<String> {
    changed_fields(before, after, mode)
        .into_iter()
        .map(|key| {
            let old = before.get(&key).map_or("(added)".to_string(), format_value);
            let new = after.get(&key).map_or("(removed)".to_string(), format_value);
            format!("{}: {} -> {}", key, old, new)
        })
        .collect()
}

fn render_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // whole floats render without the trailing `.0`
        Value::Number(n) if n.is_f64() => n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()),
        other => other.to_string(),
    }
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", truncate(s, 50)),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
