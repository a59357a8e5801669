//! Pagination total resolution
//!
//! Backend list endpoints report their total row count in several places,
//! or not at all. The resolver looks for an explicit total, falls back to
//! the page's row count, and probes with a one-row request when the total
//! it found is indistinguishable from the page length.
//!
//! The probe heuristic is an approximation: a genuine total that equals the
//! page size looks exactly like a missing one.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::crypto::EnvelopeDecoder;
use crate::error::{DecodeError, OutreachResult};

/// Locations checked for an explicit total, in priority order
const TOTAL_PATHS: [&[&str]; 4] = [&["total"], &["count"], &["meta", "total"], &["meta", "count"]];

/// Keys that may hold the row list inside a payload object
const ROW_KEYS: [&str; 5] = ["data", "rows", "items", "records", "results"];

/// Page parameters of a list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Page number (1-based)
    pub page: u32,
    /// Rows per page
    pub limit: u32,
    /// Search and filter parameters passed through unchanged
    pub filters: BTreeMap<String, String>,
}

impl PageQuery {
    /// Create a query for the given page and limit
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            filters: BTreeMap::new(),
        }
    }

    /// Add a filter parameter
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// One-row query with the same filters, used to verify a total
    pub fn probe_query(&self) -> Self {
        Self {
            page: 1,
            limit: 1,
            filters: self.filters.clone(),
        }
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// A list response: the raw body and its decoded payload
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    pub raw: Value,
    pub payload: Value,
}

impl PageResponse {
    /// Pair a raw response with its already-decoded payload
    pub fn new(raw: Value, payload: Value) -> Self {
        Self { raw, payload }
    }

    /// Build from a raw response, decoding an encrypted body if present
    pub fn open(raw: Value, decoder: &EnvelopeDecoder) -> Result<Self, DecodeError> {
        let payload = decoder.open_response(&raw)?;
        Ok(Self { raw, payload })
    }

    /// Build from a plaintext response; `data` is the payload when present
    pub fn plaintext(raw: Value) -> Self {
        let payload = raw
            .get("data")
            .or_else(|| raw.get("payload"))
            .cloned()
            .unwrap_or_else(|| raw.clone());
        Self { raw, payload }
    }

    /// Rows on this page
    pub fn rows(&self) -> &[Value] {
        page_rows(&self.payload).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total reported explicitly by the response or its payload
    pub fn explicit_total(&self) -> Option<u64> {
        [&self.raw, &self.payload].into_iter().find_map(|source| {
            TOTAL_PATHS
                .iter()
                .find_map(|path| lookup(source, path).and_then(as_count))
        })
    }
}

/// The row list of a payload: the payload itself, or its first list field
pub fn page_rows(payload: &Value) -> Option<&Vec<Value>> {
    match payload {
        Value::Array(rows) => Some(rows),
        Value::Object(obj) => ROW_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

/// Issues the one-row verification request
pub trait TotalProbe {
    fn probe(&self, query: &PageQuery) -> OutreachResult<PageResponse>;
}

impl<F> TotalProbe for F
where
    F: Fn(&PageQuery) -> OutreachResult<PageResponse>,
{
    fn probe(&self, query: &PageQuery) -> OutreachResult<PageResponse> {
        self(query)
    }
}

/// Resolves the display total of a paginated result set
#[derive(Default)]
pub struct TotalResolver<'a> {
    probe: Option<&'a dyn TotalProbe>,
}

impl<'a> TotalResolver<'a> {
    /// Create a resolver without a probe
    pub fn new() -> Self {
        Self { probe: None }
    }

    /// Create a resolver that verifies ambiguous totals with a probe
    pub fn with_probe(probe: &'a dyn TotalProbe) -> Self {
        Self { probe: Some(probe) }
    }

    /// Resolve the total for a page fetched with `query`
    pub fn resolve_total(&self, page: &PageResponse, query: &PageQuery) -> u64 {
        let row_count = page.rows().len() as u64;
        let total = page.explicit_total().unwrap_or(row_count);

        if total != row_count {
            return total;
        }

        let Some(probe) = self.probe else {
            return total;
        };

        tracing::debug!(total, "total matches page length; probing for the real count");
        match probe.probe(&query.probe_query()) {
            Ok(response) => match response.explicit_total() {
                Some(probed) if probed > total => probed,
                _ => total,
            },
            Err(e) => {
                tracing::warn!(error = %e, "total probe failed; keeping page total");
                total
            }
        }
    }
}

fn lookup<'v>(value: &'v Value, path: &[&str]) -> Option<&'v Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

fn as_count(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    (number.is_finite() && number >= 0.0).then(|| number.trunc() as u64)
}
