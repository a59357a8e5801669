//! Shared secret handling
//!
//! The backend and this engine agree on a single static symmetric key.
//! `SharedSecret` owns the raw key bytes, zeroes them on drop and never
//! prints them.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{OutreachError, OutreachResult};

/// AES variant selected by the length of the shared secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl KeySize {
    fn from_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Aes128),
            24 => Some(Self::Aes192),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }

    /// Key length in bytes
    pub fn bytes(&self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}-CBC", self.bytes() * 8)
    }
}

/// The symmetric key shared out-of-band with the backend
///
/// The key is the raw UTF-8 bytes of the configured secret text. No
/// derivation is applied, so the secret must be exactly 16, 24 or 32 bytes.
#[derive(Clone)]
pub struct SharedSecret {
    bytes: Zeroizing<Vec<u8>>,
    size: KeySize,
}

impl SharedSecret {
    /// Create a shared secret from its configured text
    pub fn new(secret: impl Into<String>) -> OutreachResult<Self> {
        let bytes = Zeroizing::new(secret.into().into_bytes());
        let size = KeySize::from_len(bytes.len()).ok_or_else(|| {
            OutreachError::Config(format!(
                "Shared secret must be 16, 24 or 32 bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Self { bytes, size })
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// AES variant this key selects
    pub fn key_size(&self) -> KeySize {
        self.size
    }
}

// Key material stays out of Debug output
impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret")
            .field("key_size", &self.size)
            .finish_non_exhaustive()
    }
}
