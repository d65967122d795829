//! Sealed envelope format and the seal/unseal operations.
//!
//! Wire format (fixed, no negotiation):
//!
//! ```text
//! base64( nonce[12] || ciphertext[n] || tag[16] )
//! ```
//!
//! AES-256-GCM with no associated data, keyed by
//! `PBKDF2-HMAC-SHA256(secret, salt, 600_000, 32)`. Base64 uses the standard
//! alphabet with padding. The salt travels separately, hex-encoded.
//!
//! A browser sealing with WebCrypto and this module must produce identical
//! envelopes for identical (secret, salt, nonce, plaintext) inputs.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::key::{derive_key, DerivedKey, Salt};
use crate::error::{LaterlockError, Result};

/// Nonce length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Base64-encoded `nonce || ciphertext || tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope(String);

impl Envelope {
    /// Wrap an encoded envelope without checking it.
    ///
    /// Use this for envelopes read back from storage; `unseal` performs its
    /// own decoding.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Accept an envelope from an untrusted producer.
    ///
    /// Checks that it is valid base64 and long enough to hold a nonce and a
    /// tag. It cannot check authenticity without the secret.
    pub fn parse(encoded: &str) -> Result<Self> {
        let decoded = STANDARD.decode(encoded.trim()).map_err(|_| {
            LaterlockError::Validation("Sealed content must be base64-encoded".to_string())
        })?;
        if decoded.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(LaterlockError::Validation(
                "Sealed content is too short to be an envelope".to_string(),
            ));
        }
        Ok(Self(encoded.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Length of the encoded form in characters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output of [`seal`]: the envelope plus the salt needed to open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub envelope: Envelope,
    pub salt: Salt,
}

/// Seal plaintext under a secret.
///
/// Generates a fresh salt and nonce on every call, so sealing the same
/// plaintext twice never yields the same envelope.
///
/// # Examples
///
/// ```no_run
/// use laterlock_core::crypto::{seal, unseal};
///
/// let sealed = seal("meet at noon", "correct-horse-battery").unwrap();
/// let opened = unseal(&sealed.envelope, "correct-horse-battery", &sealed.salt).unwrap();
/// assert_eq!(opened, "meet at noon");
/// ```
pub fn seal(plaintext: &str, secret: &str) -> Result<Sealed> {
    let salt = Salt::generate();
    let key = derive_key(secret, &salt)?;

    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);

    let envelope = seal_with_key(plaintext, &key, &nonce)?;
    Ok(Sealed { envelope, salt })
}

/// Deterministic sealing core: fixed key and nonce.
///
/// Never reuse a nonce with the same key outside of test vectors.
pub fn seal_with_key(
    plaintext: &str,
    key: &DerivedKey,
    nonce: &[u8; NONCE_LENGTH],
) -> Result<Envelope> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| LaterlockError::Crypto(format!("Invalid key length: {}", e)))?;

    let ciphertext_and_tag = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext.as_bytes())
        .map_err(|_| LaterlockError::Crypto("AES-GCM encryption failed".to_string()))?;

    let mut combined = Vec::with_capacity(NONCE_LENGTH + ciphertext_and_tag.len());
    combined.extend_from_slice(nonce);
    combined.extend_from_slice(&ciphertext_and_tag);

    Ok(Envelope(STANDARD.encode(combined)))
}

/// Unseal an envelope with the secret and salt it was sealed under.
///
/// # Errors
///
/// Returns `LaterlockError::Decryption` for a wrong secret, a tampered
/// envelope, or an envelope that is not decodable at all. The caller cannot
/// tell these apart.
pub fn unseal(envelope: &Envelope, secret: &str, salt: &Salt) -> Result<String> {
    let key = derive_key(secret, salt)?;
    unseal_with_key(envelope, &key)
}

/// Unseal with an already-derived key.
pub fn unseal_with_key(envelope: &Envelope, key: &DerivedKey) -> Result<String> {
    let combined = STANDARD
        .decode(envelope.as_str().trim())
        .map_err(|_| LaterlockError::Decryption)?;
    if combined.len() < NONCE_LENGTH + TAG_LENGTH {
        return Err(LaterlockError::Decryption);
    }

    let (nonce, ciphertext_and_tag) = combined.split_at(NONCE_LENGTH);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| LaterlockError::Crypto(format!("Invalid key length: {}", e)))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext_and_tag)
        .map_err(|_| LaterlockError::Decryption)?;

    String::from_utf8(plaintext).map_err(|_| LaterlockError::Decryption)
}
