//! Cryptographic functions for the outreach records engine
//!
//! Provides AES-CBC envelope decoding with a statically configured shared
//! secret, plus the matching sealing routine used to build fixtures.

pub mod envelope;
pub mod secret;

pub use envelope::{looks_like_envelope, CipherEncoding, EnvelopeDecoder, IV_SIZE};
pub use secret::{KeySize, SharedSecret};
