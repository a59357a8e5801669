//! Audit summarization for the outreach records engine
//!
//! Turns raw audit trail rows (before/after snapshots of a database row)
//! into short human-readable descriptions.
//!
//! # Architecture
//!
//! The audit system consists of these components:
//!
//! - `AuditEvent`: one audit row with its action label, table name and
//!   optional before/after snapshots.
//! - `AuditSummarizer`: classifies the action and renders a one-line
//!   description, including a field-level diff for updates.
//! - `identity`: picks a display label (username, name, id) for a snapshot.
//! - `changed_fields` / `describe_changes`: field-level diffs.
//! - `AuditReader`: loads exported audit rows (JSON or JSONL).
//!
//! # Example
//!
//! ```rust,ignore
//! use outreach::audit::{AuditEvent, AuditSummarizer};
//! use serde_json::json;
//!
//! let summarizer = AuditSummarizer::default();
//! let event = AuditEvent::new(
//!     "UPDATE",
//!     "users",
//!     json!({"status": "Active", "city": "Manila"}),
//!     json!({"status": "Inactive", "city": "Manila"}),
//! );
//! assert_eq!(summarizer.summarize(&event), "Updated status");
//! ```

mod diff;
mod event;
mod identity;
mod reader;
mod summary;

pub use diff::{changed_fields, describe_changes, EqualityMode};
pub use event::{coerce_snapshot, ActionKind, AuditEvent};
pub use identity::identity;
pub use reader::AuditReader;
pub use summary::{AuditSummarizer, MAX_LISTED_CHANGES};
