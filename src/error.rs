//! Custom error types for the outreach records engine
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions. `DecodeError` covers the envelope path
//! on its own so callers can match on it and fall back to the raw value.

use thiserror::Error;

/// Reasons an envelope could not be turned into a decoded value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The envelope does not split into two non-empty segments
    #[error("Malformed envelope: {0}")]
    Malformed(String),

    /// The IV segment is not 16 bytes of hex or base64
    #[error("Invalid initialization vector: {0}")]
    InvalidIv(String),

    /// Neither ciphertext encoding produced usable text
    #[error("Decryption failed: empty result")]
    EmptyResult,

    /// The plaintext looked like a JSON container but did not parse
    #[error("Invalid structured payload: {0}")]
    InvalidStructure(String),
}

/// The main error type for outreach records operations
#[derive(Error, Debug)]
pub enum OutreachError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid input supplied by the caller
    #[error("Validation error: {0}")]
    Validation(String),

    /// Envelope decoding errors
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Encryption errors (sealing, key setup)
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl OutreachError {
    /// Check if this is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for OutreachError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for OutreachError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for outreach records operations
pub type OutreachResult<T> = Result<T, OutreachError>;
