//! Key source resolution for lock creation.
//!
//! A creation request carries exactly one of:
//! - an envelope plus salt sealed upstream under a user passphrase, stored
//!   verbatim as [`SealMode::Passphrase`]
//! - plaintext, sealed here under the system key and stored as
//!   [`SealMode::SystemKey`]
//!
//! All checks run before any sealing or storage work.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::crypto::{Envelope, Salt, SystemKey};
use crate::error::{LaterlockError, Result};
use crate::storage::SealMode;

/// Default plaintext ceiling, in characters.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Fixed allowance added to the scaled plaintext ceiling for the envelope.
pub const ENVELOPE_OVERHEAD_CHARS: usize = 64;

/// Incoming creation request, camelCase on the wire.
///
/// Empty strings are treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLockRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub delay_minutes: Option<i64>,
    #[serde(default)]
    pub encrypted_content: Option<String>,
    #[serde(default)]
    pub salt: Option<String>,
}

/// Size ceilings enforced at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLimits {
    pub max_plaintext_chars: usize,
    pub max_envelope_chars: usize,
}

impl ContentLimits {
    /// Envelope ceiling sized for encryption and base64 expansion:
    /// `ceil(1.5 * max_plaintext_chars) + 64`.
    pub fn for_plaintext(max_plaintext_chars: usize) -> Self {
        Self {
            max_plaintext_chars,
            max_envelope_chars: (max_plaintext_chars * 3).div_ceil(2) + ENVELOPE_OVERHEAD_CHARS,
        }
    }
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self::for_plaintext(MAX_CONTENT_CHARS)
    }
}

/// Sealed content ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub sealed_content: Envelope,
    pub salt: Salt,
    pub seal_mode: SealMode,
}

/// A validated creation request whose content has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLock {
    pub title: Option<String>,
    pub delay_minutes: u32,
    pub content: ResolvedContent,
}

/// Decides which secret seals a new lock's content.
#[derive(Debug, Clone)]
pub struct KeySourceResolver {
    system_key: Option<SystemKey>,
    limits: ContentLimits,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl KeySourceResolver {
    pub fn new(system_key: Option<SystemKey>) -> Self {
        Self {
            system_key,
            limits: ContentLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ContentLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> ContentLimits {
        self.limits
    }

    /// Validate a request and seal its content if needed.
    ///
    /// Takes the request by value so plaintext is wiped once sealed.
    ///
    /// # Errors
    ///
    /// Returns `LaterlockError::Validation` if:
    /// - `delayMinutes` is missing, not positive, or too large
    /// - both or neither of plaintext and envelope are supplied
    /// - an envelope arrives without its salt, or a salt without an envelope
    /// - content exceeds its ceiling
    ///
    /// Returns `LaterlockError::Crypto` if plaintext is supplied but no system
    /// key is configured.
    pub fn resolve(&self, request: CreateLockRequest) -> Result<NewLock> {
        let delay_minutes = Self::validate_delay(request.delay_minutes)?;
        let title = request
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let plaintext = present(request.content);
        let envelope = present(request.encrypted_content);
        let salt = present(request.salt);

        let content = match (plaintext, envelope, salt) {
            (Some(_), Some(_), _) => {
                return Err(LaterlockError::Validation(
                    "Supply either content or encryptedContent, not both".to_string(),
                ))
            }
            (Some(_), None, Some(_)) => {
                return Err(LaterlockError::Validation(
                    "A salt is only accepted together with encryptedContent".to_string(),
                ))
            }
            (None, None, _) => {
                return Err(LaterlockError::Validation(
                    "Content is required".to_string(),
                ))
            }
            (None, Some(_), None) => {
                return Err(LaterlockError::Validation(
                    "encryptedContent requires its salt".to_string(),
                ))
            }
            (None, Some(envelope), Some(salt)) => self.accept_sealed(&envelope, &salt)?,
            (Some(plaintext), None, None) => self.seal_plaintext(plaintext)?,
        };

        Ok(NewLock {
            title,
            delay_minutes,
            content,
        })
    }

    fn validate_delay(delay_minutes: Option<i64>) -> Result<u32> {
        let minutes = delay_minutes.ok_or_else(|| {
            LaterlockError::Validation("Delay minutes are required".to_string())
        })?;
        if minutes <= 0 {
            return Err(LaterlockError::Validation(
                "Delay minutes must be a positive integer".to_string(),
            ));
        }
        u32::try_from(minutes).map_err(|_| {
            LaterlockError::Validation(format!("Delay of {} minutes is too large", minutes))
        })
    }

    fn accept_sealed(&self, envelope: &str, salt: &str) -> Result<ResolvedContent> {
        if envelope.chars().count() > self.limits.max_envelope_chars {
            return Err(LaterlockError::Validation(
                "Encrypted content exceeds maximum allowed size".to_string(),
            ));
        }
        let sealed_content = Envelope::parse(envelope)?;
        let salt = Salt::from_hex(salt)?;

        Ok(ResolvedContent {
            sealed_content,
            salt,
            seal_mode: SealMode::Passphrase,
        })
    }

    fn seal_plaintext(&self, mut plaintext: String) -> Result<ResolvedContent> {
        if plaintext.chars().count() > self.limits.max_plaintext_chars {
            plaintext.zeroize();
            return Err(LaterlockError::Validation(format!(
                "Content exceeds maximum length of {} characters",
                self.limits.max_plaintext_chars
            )));
        }

        let Some(system_key) = self.system_key.as_ref() else {
            plaintext.zeroize();
            return Err(LaterlockError::Crypto(
                "System key is not configured".to_string(),
            ));
        };

        let sealed = system_key.seal(&plaintext);
        plaintext.zeroize();
        let sealed = sealed?;

        Ok(ResolvedContent {
            sealed_content: sealed.envelope,
            salt: sealed.salt,
            seal_mode: SealMode::SystemKey,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE: &str = "ZGVmZ2hpamtsbW5vf0mftnG1Mi7K5ezlIijnikMO/XGhGMgwdg+81L6W8/D41lnfU/yq";
    const SALT: &str = "000102030405060708090a0b0c0d0e0f";

    fn resolver() -> KeySourceResolver {
        KeySourceResolver::new(None)
    }

    fn sealed_request() -> CreateLockRequest {
        CreateLockRequest {
            title: Some("  Letter  ".to_string()),
            content: None,
            delay_minutes: Some(60),
            encrypted_content: Some(ENVELOPE.to_string()),
            salt: Some(SALT.to_string()),
        }
    }

    #[test]
    fn test_default_limits() {
        let limits = ContentLimits::default();
        assert_eq!(limits.max_plaintext_chars, 2000);
        assert_eq!(limits.max_envelope_chars, 3064);
        assert_eq!(ContentLimits::for_plaintext(3).max_envelope_chars, 5 + 64);
    }

    #[test]
    fn test_sealed_path_stored_verbatim() {
        let new_lock = resolver().resolve(sealed_request()).unwrap();
        assert_eq!(new_lock.title.as_deref(), Some("Letter"));
        assert_eq!(new_lock.delay_minutes, 60);
        assert_eq!(new_lock.content.seal_mode, SealMode::Passphrase);
        assert_eq!(new_lock.content.sealed_content.as_str(), ENVELOPE);
        assert_eq!(new_lock.content.salt.to_hex(), SALT);
    }

    #[test]
    fn test_both_sources_rejected() {
        let mut request = sealed_request();
        request.content = Some("plain".to_string());
        let err = resolver().resolve(request).unwrap_err();
        assert!(matches!(err, LaterlockError::Validation(_)));
    }

    #[test]
    fn test_neither_source_rejected() {
        let mut request = sealed_request();
        request.encrypted_content = Some(String::new());
        request.salt = None;
        let err = resolver().resolve(request).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Content is required");
    }

    #[test]
    fn test_envelope_without_salt_rejected() {
        let mut request = sealed_request();
        request.salt = None;
        assert!(resolver().resolve(request).is_err());

        let request = CreateLockRequest {
            content: Some("plain".to_string()),
            salt: Some(SALT.to_string()),
            delay_minutes: Some(1),
            ..Default::default()
        };
        assert!(resolver().resolve(request).is_err());
    }

    #[test]
    fn test_delay_validation() {
        for delay in [None, Some(0), Some(-5), Some(i64::from(u32::MAX) + 1)] {
            let mut request = sealed_request();
            request.delay_minutes = delay;
            assert!(
                matches!(
                    resolver().resolve(request),
                    Err(LaterlockError::Validation(_))
                ),
                "delay {:?} accepted",
                delay
            );
        }
    }

    #[test]
    fn test_envelope_ceiling() {
        let mut request = sealed_request();
        request.encrypted_content = Some("A".repeat(3068));
        let err = resolver().resolve(request).unwrap_err();
        assert!(err.to_string().contains("maximum allowed size"));
    }

    #[test]
    fn test_plaintext_ceiling_counts_characters() {
        let request = CreateLockRequest {
            content: Some("é".repeat(2001)),
            delay_minutes: Some(1),
            ..Default::default()
        };
        let err = resolver().resolve(request).unwrap_err();
        assert!(err.to_string().contains("2000 characters"));
    }

    #[test]
    fn test_malformed_salt_rejected() {
        let mut request = sealed_request();
        request.salt = Some("not-hex".to_string());
        assert!(matches!(
            resolver().resolve(request),
            Err(LaterlockError::Validation(_))
        ));
    }

    #[test]
    fn test_plaintext_without_system_key_is_internal() {
        let request = CreateLockRequest {
            content: Some("hello".to_string()),
            delay_minutes: Some(1),
            ..Default::default()
        };
        let err = resolver().resolve(request).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_plaintext_sealed_under_system_key() {
        let key = SystemKey::new("system-secret").unwrap();
        let resolver = KeySourceResolver::new(Some(key.clone()));
        let request = CreateLockRequest {
            content: Some("see you soon".to_string()),
            delay_minutes: Some(1),
            ..Default::default()
        };

        let new_lock = resolver.resolve(request).unwrap();
        assert_eq!(new_lock.content.seal_mode, SealMode::SystemKey);
        assert_ne!(new_lock.content.sealed_content.as_str(), "see you soon");
        let opened = key
            .unseal(&new_lock.content.sealed_content, &new_lock.content.salt)
            .unwrap();
        assert_eq!(opened, "see you soon");
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: CreateLockRequest = serde_json::from_str(
            r#"{"delayMinutes": 5, "encryptedContent": "abc", "salt": "00"}"#,
        )
        .unwrap();
        assert_eq!(request.delay_minutes, Some(5));
        assert_eq!(request.encrypted_content.as_deref(), Some("abc"));
        assert!(request.title.is_none());
    }
}
