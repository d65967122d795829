//! Process-wide system secret for the system-key sealing path.
//!
//! The derived key is not cached. Each lock has its own salt, so a cache
//! would hold one live AES key per disclosed lock for the life of the
//! process; recomputing keeps key material in memory only for the duration
//! of a single seal or unseal.

use secrecy::{ExposeSecret, SecretString};

use super::envelope::{seal, unseal, Envelope, Sealed};
use super::key::Salt;
use crate::error::{LaterlockError, Result};

/// The server-held secret used when no user passphrase is involved.
#[derive(Clone)]
pub struct SystemKey {
    secret: SecretString,
}

impl SystemKey {
    /// Environment variable the secret is conventionally read from.
    pub const ENV_VAR: &'static str = "LATERLOCK_SYSTEM_KEY";

    /// Wrap a secret.
    ///
    /// # Errors
    ///
    /// Returns `LaterlockError::Validation` if the secret is blank.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret: String = secret.into();
        if secret.trim().is_empty() {
            return Err(LaterlockError::Validation(
                "System key cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            secret: SecretString::from(secret),
        })
    }

    /// Read the secret from `LATERLOCK_SYSTEM_KEY`, if set and non-blank.
    pub fn from_env() -> Option<Self> {
        std::env::var(Self::ENV_VAR)
            .ok()
            .and_then(|value| Self::new(value).ok())
    }

    pub fn seal(&self, plaintext: &str) -> Result<Sealed> {
        seal(plaintext, self.secret.expose_secret())
    }

    pub fn unseal(&self, envelope: &Envelope, salt: &Salt) -> Result<String> {
        unseal(envelope, self.secret.expose_secret(), salt)
    }
}

impl std::fmt::Debug for SystemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemKey")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_secret_rejected() {
        assert!(SystemKey::new("").is_err());
        assert!(SystemKey::new("   ").is_err());
    }

    #[test]
    fn test_debug_redacts() {
        let key = SystemKey::new("super-secret-system-key").unwrap();
        let output = format!("{:?}", key);
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("super-secret"));
    }

    #[test]
    fn test_seal_unseal_round_trip() {
        let key = SystemKey::new("system-secret").unwrap();
        let sealed = key.seal("for later").unwrap();
        assert_eq!(key.unseal(&sealed.envelope, &sealed.salt).unwrap(), "for later");
    }
}
