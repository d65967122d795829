//! Key derivation using PBKDF2-HMAC-SHA-256.
//!
//! The parameters are part of the envelope wire contract: every party that
//! seals or unseals content must derive the same key from the same
//! (secret, salt) pair, so none of these constants may change.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{LaterlockError, Result};

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 600_000;

/// Length of derived key in bytes (256-bit AES key).
pub const KEY_LENGTH: usize = 32;

/// Length of the per-lock salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Per-lock random salt, hex-encoded wherever it leaves memory.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt {
    bytes: [u8; SALT_LENGTH],
}

impl Salt {
    /// Generate a fresh random salt from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse a hex-encoded salt (exactly 32 hex characters).
    pub fn from_hex(value: &str) -> Result<Self> {
        let decoded = hex::decode(value.trim())
            .map_err(|_| LaterlockError::Validation("Salt must be hex-encoded".to_string()))?;
        let bytes: [u8; SALT_LENGTH] = decoded.as_slice().try_into().map_err(|_| {
            LaterlockError::Validation(format!("Salt must be {} bytes", SALT_LENGTH))
        })?;
        Ok(Self { bytes })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.bytes
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Salt({})", self.to_hex())
    }
}

impl std::fmt::Display for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A cryptographic key derived from a secret.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure source.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 256-bit key from a secret and salt.
///
/// The secret is taken as its UTF-8 bytes. Deterministic for a given
/// (secret, salt) pair. CPU-bound: expect tens of milliseconds per call,
/// so callers on an async runtime should run this on a blocking thread.
///
/// # Errors
///
/// Returns `LaterlockError::Validation` if the secret is empty.
///
/// # Examples
///
/// ```
/// use laterlock_core::crypto::{derive_key, Salt};
///
/// let salt = Salt::from_bytes([7u8; 16]);
/// let key = derive_key("my-passphrase", &salt).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(secret: &str, salt: &Salt) -> Result<DerivedKey> {
    if secret.is_empty() {
        return Err(LaterlockError::Validation(
            "Secret cannot be empty".to_string(),
        ));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(
        secret.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut key_bytes,
    );

    Ok(DerivedKey::from_bytes(key_bytes))
}
