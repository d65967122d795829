//! Lock record types.
//!
//! [`Lock`] is the only persistent entity. [`LockState`] and [`LockStatus`]
//! are projections computed from it and are never stored.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::crypto::{Envelope, Salt};
use crate::error::{LaterlockError, Result};

/// Number of characters in a generated lock id (6 bits each, 180 bits total).
pub const LOCK_ID_LENGTH: usize = 30;

/// Longest id accepted from callers.
pub const MAX_LOCK_ID_LENGTH: usize = 64;

const ID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Opaque lock identifier. Doubles as the capability to act on the lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockId(String);

impl LockId {
    /// Generate a fresh URL-safe id from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; LOCK_ID_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        // 256 is a multiple of 64, so masking keeps the distribution uniform
        let id = bytes
            .iter()
            .map(|b| ID_ALPHABET[(b & 0x3f) as usize] as char)
            .collect();
        Self(id)
    }

    /// Accept an id supplied by a caller.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(LaterlockError::Validation(
                "Lock ID is required".to_string(),
            ));
        }
        if value.len() > MAX_LOCK_ID_LENGTH || !value.bytes().all(|b| ID_ALPHABET.contains(&b)) {
            return Err(LaterlockError::Validation(format!(
                "Invalid lock ID: {}",
                value
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LockId {
    type Err = LaterlockError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Which secret sealed a lock's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SealMode {
    /// Sealed upstream under a user passphrase the server never holds.
    Passphrase,
    /// Sealed by the server under the process-wide system key.
    SystemKey,
}

impl SealMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SealMode::Passphrase => "passphrase",
            SealMode::SystemKey => "systemKey",
        }
    }

    /// The `isEncrypted` flag exposed to clients.
    pub fn is_passphrase(&self) -> bool {
        matches!(self, SealMode::Passphrase)
    }
}

impl fmt::Display for SealMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SealMode {
    type Err = LaterlockError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "passphrase" => Ok(SealMode::Passphrase),
            "systemKey" => Ok(SealMode::SystemKey),
            other => Err(LaterlockError::Storage(format!(
                "Unknown seal mode: {}",
                other
            ))),
        }
    }
}

/// A persisted lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    pub id: LockId,
    pub title: Option<String>,
    pub sealed_content: Envelope,
    pub delay_minutes: u32,
    pub salt: Salt,
    pub seal_mode: SealMode,
    pub created_at: DateTime<Utc>,
    pub access_requested_at: Option<DateTime<Utc>>,
    pub last_accessed: Option<DateTime<Utc>>,
}

impl Lock {
    pub fn delay_millis(&self) -> i64 {
        i64::from(self.delay_minutes) * 60_000
    }

    /// When the lock becomes eligible, if access has been requested.
    pub fn eligible_at_millis(&self) -> Option<i64> {
        self.access_requested_at
            .map(|requested| requested.timestamp_millis() + self.delay_millis())
    }

    /// Derive the disclosure state at `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> LockState {
        match self.eligible_at_millis() {
            None => LockState::Locked,
            Some(eligible_at) => {
                let remaining = eligible_at - now.timestamp_millis();
                if remaining > 0 {
                    LockState::Pending {
                        remaining_ms: remaining as u64,
                    }
                } else {
                    LockState::Eligible
                }
            }
        }
    }

    /// Public, non-sensitive projection at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> LockStatus {
        let state = self.state_at(now);
        LockStatus {
            id: self.id.clone(),
            title: self.title.clone(),
            delay_minutes: self.delay_minutes,
            is_encrypted: self.seal_mode.is_passphrase(),
            seal_mode: self.seal_mode,
            access_requested_at: self.access_requested_at.map(|t| t.timestamp_millis()),
            created_at: self.created_at.timestamp_millis(),
            remaining_milliseconds: state.remaining_ms(),
            state: state.name().to_string(),
        }
    }
}

/// Disclosure state, always derived fresh from the record and the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Pending { remaining_ms: u64 },
    Eligible,
}

impl LockState {
    pub fn name(&self) -> &'static str {
        match self {
            LockState::Locked => "locked",
            LockState::Pending { .. } => "pending",
            LockState::Eligible => "eligible",
        }
    }

    pub fn remaining_ms(&self) -> u64 {
        match self {
            LockState::Pending { remaining_ms } => *remaining_ms,
            _ => 0,
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields safe to return to any holder of the lock id.
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockStatus {
    pub id: LockId,
    pub title: Option<String>,
    pub delay_minutes: u32,
    pub is_encrypted: bool,
    pub seal_mode: SealMode,
    pub access_requested_at: Option<i64>,
    pub created_at: i64,
    pub remaining_milliseconds: u64,
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn sample_lock(requested: Option<i64>, delay_minutes: u32) -> Lock {
        Lock {
            id: LockId::generate(),
            title: None,
            sealed_content: Envelope::new("AAAA"),
            delay_minutes,
            salt: Salt::from_bytes([0u8; 16]),
            seal_mode: SealMode::SystemKey,
            created_at: at(0),
            access_requested_at: requested.map(at),
            last_accessed: None,
        }
    }

    #[test]
    fn test_generated_id_shape() {
        let id = LockId::generate();
        assert_eq!(id.as_str().len(), LOCK_ID_LENGTH);
        assert!(LockId::parse(id.as_str()).is_ok());
        assert_ne!(LockId::generate(), id);
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        assert!(LockId::parse("").is_err());
        assert!(LockId::parse("has space").is_err());
        assert!(LockId::parse("../etc/passwd").is_err());
        assert!(LockId::parse(&"a".repeat(65)).is_err());
        assert!(LockId::parse("V1StGXR8_Z5jdHi6B-myT").is_ok());
    }

    #[test]
    fn test_state_locked_without_request() {
        let lock = sample_lock(None, 1);
        assert_eq!(lock.state_at(at(10_000_000)), LockState::Locked);
    }

    #[test]
    fn test_state_pending_then_eligible_at_boundary() {
        let lock = sample_lock(Some(1_000), 1);
        assert_eq!(
            lock.state_at(at(1_000)),
            LockState::Pending {
                remaining_ms: 60_000
            }
        );
        assert_eq!(
            lock.state_at(at(60_999)),
            LockState::Pending { remaining_ms: 1 }
        );
        assert_eq!(lock.state_at(at(61_000)), LockState::Eligible);
        assert_eq!(lock.state_at(at(99_000_000)), LockState::Eligible);
    }

    #[test]
    fn test_status_projection() {
        let lock = sample_lock(Some(0), 2);
        let status = lock.status_at(at(30_000));
        assert_eq!(status.remaining_milliseconds, 90_000);
        assert_eq!(status.state, "pending");
        assert!(!status.is_encrypted);

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["delayMinutes"], 2);
        assert_eq!(json["sealMode"], "systemKey");
        assert_eq!(json["accessRequestedAt"], 0);
        assert!(json.get("salt").is_none());
    }

    #[test]
    fn test_seal_mode_round_trip() {
        for mode in [SealMode::Passphrase, SealMode::SystemKey] {
            assert_eq!(mode.as_str().parse::<SealMode>().unwrap(), mode);
        }
        assert!("plain".parse::<SealMode>().is_err());
    }
}
