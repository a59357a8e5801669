//! Envelope decoding
//!
//! An envelope is `<iv>:<ciphertext>`: a 16-byte IV and an AES-CBC/PKCS#7
//! ciphertext, each text-encoded. The backend is inconsistent about the
//! ciphertext encoding, so decoding tries hex first and base64 second.

use std::fmt;
use std::str::FromStr;

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DecodeError, OutreachError, OutreachResult};

use super::secret::{KeySize, SharedSecret};

/// Size of the CBC initialization vector in bytes
pub const IV_SIZE: usize = 16;

/// Text encodings a ciphertext segment may arrive in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherEncoding {
    #[default]
    Hex,
    Base64,
}

impl CipherEncoding {
    /// Order in which decoding attempts are made
    pub const FALLBACK_ORDER: [CipherEncoding; 2] = [CipherEncoding::Hex, CipherEncoding::Base64];

    fn decode(&self, text: &str) -> Option<Vec<u8>> {
        let text = text.trim();
        let bytes = match self {
            Self::Hex => hex::decode(text).ok()?,
            Self::Base64 => STANDARD.decode(text).ok()?,
        };
        (!bytes.is_empty()).then_some(bytes)
    }

    fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base64 => STANDARD.encode(bytes),
        }
    }
}

impl fmt::Display for CipherEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

impl FromStr for CipherEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "base64" | "b64" => Ok(Self::Base64),
            other => Err(format!(
                "Unknown cipher encoding '{}'. Valid encodings: hex, base64",
                other
            )),
        }
    }
}

/// Decrypts envelopes with an injected shared secret
#[derive(Debug, Clone)]
pub struct EnvelopeDecoder {
    secret: SharedSecret,
}

impl EnvelopeDecoder {
    /// Create a decoder for the given shared secret
    pub fn new(secret: SharedSecret) -> Self {
        Self { secret }
    }

    /// Decode an envelope into a structured value or a plain string
    pub fn decode(&self, envelope: &str) -> Result<Value, DecodeError> {
        let text = self.decrypt_text(envelope)?;
        parse_plaintext(text)
    }

    /// Decrypt an envelope to its plaintext without interpreting it
    pub fn decrypt_text(&self, envelope: &str) -> Result<String, DecodeError> {
        let (iv_part, cipher_part) = split_envelope(envelope)?;
        let iv = decode_iv(iv_part)?;

        for encoding in CipherEncoding::FALLBACK_ORDER {
            match self.try_decrypt(&iv, cipher_part, encoding) {
                Some(text) => return Ok(text),
                None => tracing::debug!(%encoding, "ciphertext segment did not yield text"),
            }
        }

        Err(DecodeError::EmptyResult)
    }

    /// Return the payload of a raw backend response
    ///
    /// A string `data` (or `payload`) field is treated as an envelope and
    /// decoded. Any other `data` value is already plaintext. A response
    /// with neither field is its own payload.
    pub fn open_response(&self, response: &Value) -> Result<Value, DecodeError> {
        let Some(obj) = response.as_object() else {
            return Ok(response.clone());
        };

        match obj.get("data").or_else(|| obj.get("payload")) {
            Some(Value::String(envelope)) => self.decode(envelope),
            Some(other) => Ok(other.clone()),
            None => Ok(response.clone()),
        }
    }

    /// Produce an envelope for a value using a random IV
    ///
    /// String scalars are encrypted as their raw text, everything else as
    /// compact JSON, matching what the backend sends.
    pub fn seal(&self, value: &Value, encoding: CipherEncoding) -> OutreachResult<String> {
        let mut iv = [0u8; IV_SIZE];
        getrandom::getrandom(&mut iv)
            .map_err(|e| OutreachError::Encryption(format!("Failed to generate IV: {}", e)))?;
        self.seal_with_iv(value, &iv, encoding)
    }

    /// Produce an envelope for a value using the given IV
    pub fn seal_with_iv(
        &self,
        value: &Value,
        iv: &[u8; IV_SIZE],
        encoding: CipherEncoding,
    ) -> OutreachResult<String> {
        let plaintext = match value {
            Value::String(s) => s.clone(),
            other => serde_json::to_string(other)?,
        };
        let ciphertext = cbc_encrypt(&self.secret, iv, plaintext.as_bytes())?;
        Ok(format!("{}:{}", hex::encode(iv), encoding.encode(&ciphertext)))
    }

    fn try_decrypt(
        &self,
        iv: &[u8; IV_SIZE],
        cipher_part: &str,
        encoding: CipherEncoding,
    ) -> Option<String> {
        let ciphertext = encoding.decode(cipher_part)?;
        let plaintext = cbc_decrypt(&self.secret, iv, &ciphertext)?;
        let text = String::from_utf8(plaintext).ok()?;
        (!text.is_empty()).then_some(text)
    }
}

/// Check whether a string has the outward shape of an envelope
pub fn looks_like_envelope(raw: &str) -> bool {
    raw.contains(':')
}

fn split_envelope(envelope: &str) -> Result<(&str, &str), DecodeError> {
    let (iv_part, cipher_part) = envelope
        .trim()
        .split_once(':')
        .ok_or_else(|| DecodeError::Malformed("missing ':' separator".to_string()))?;

    if iv_part.is_empty() || cipher_part.is_empty() {
        return Err(DecodeError::Malformed("empty segment".to_string()));
    }

    Ok((iv_part, cipher_part))
}

fn decode_iv(iv_part: &str) -> Result<[u8; IV_SIZE], DecodeError> {
    CipherEncoding::FALLBACK_ORDER
        .iter()
        .filter_map(|encoding| encoding.decode(iv_part))
        .find_map(|bytes| <[u8; IV_SIZE]>::try_from(bytes.as_slice()).ok())
        .ok_or_else(|| DecodeError::InvalidIv(format!("expected {} bytes", IV_SIZE)))
}

fn parse_plaintext(text: String) -> Result<Value, DecodeError> {
    let trimmed = text.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Ok(value),
        Err(e) if is_container_shaped(trimmed) => Err(DecodeError::InvalidStructure(e.to_string())),
        Err(_) => Ok(Value::String(text)),
    }
}

fn is_container_shaped(text: &str) -> bool {
    (text.starts_with('{') && text.ends_with('}')) || (text.starts_with('[') && text.ends_with(']'))
}

fn cbc_decrypt(secret: &SharedSecret, iv: &[u8; IV_SIZE], ciphertext: &[u8]) -> Option<Vec<u8>> {
    let key = secret.as_bytes();
    match secret.key_size() {
        KeySize::Aes128 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .ok()?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .ok(),
        KeySize::Aes192 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
            .ok()?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .ok(),
        KeySize::Aes256 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .ok()?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .ok(),
    }
}

fn cbc_encrypt(
    secret: &SharedSecret,
    iv: &[u8; IV_SIZE],
    plaintext: &[u8],
) -> OutreachResult<Vec<u8>> {
    let key = secret.as_bytes();
    let invalid = |e: aes::cipher::InvalidLength| OutreachError::Encryption(format!("Failed to create cipher: {}", e));
    let ciphertext = match secret.key_size() {
        KeySize::Aes128 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        KeySize::Aes192 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        KeySize::Aes256 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
    };
    Ok(ciphertext)
}
