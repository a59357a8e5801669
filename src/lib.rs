//! Outreach Records - encrypted payload decoding and audit summaries
//!
//! The records console's backend returns sensitive payloads as
//! `IV:ciphertext` envelopes (AES-CBC with a shared secret) and keeps an
//! audit trail of before/after snapshots. This library decodes those
//! envelopes and turns audit rows into one-line human summaries.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `crypto`: Shared secret handling and the envelope decoder
//! - `services`: Field normalization and pagination total resolution
//! - `display`: Previews, timestamp rendering and the audit table
//! - `audit`: Audit events, diffs and summaries
//! - `engine`: The pieces above wired together from settings
//! - `config`: Configuration and path management
//! - `export`: CSV and JSON export of summaries
//! - `cli`: Command handlers for the `outreach` binary
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use outreach::config::{resolve_secret, OutreachPaths, Settings};
//!
//! let paths = OutreachPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let secret = resolve_secret(std::env::var("OUTREACH_SHARED_SECRET").ok(), &settings)?;
//! let engine = settings.engine(secret.expect("secret configured"))?;
//! let value = engine.decoder().decode("a1b2...:9f8e...")?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod services;

pub use audit::{AuditEvent, AuditSummarizer};
pub use crypto::{EnvelopeDecoder, SharedSecret};
pub use engine::{Engine, SummaryRow};
pub use error::{DecodeError, OutreachError, OutreachResult};
pub use services::{TotalResolver, ValueNormalizer};
