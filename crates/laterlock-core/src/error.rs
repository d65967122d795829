//! Error types for LaterLock core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI and HTTP layers map
//! these to exit codes, status codes and user-facing messages.

use thiserror::Error;

/// Result type alias for LaterLock operations.
pub type Result<T> = std::result::Result<T, LaterlockError>;

/// Core error type for LaterLock operations.
#[derive(Debug, Error)]
pub enum LaterlockError {
    /// Missing, oversized or ambiguous input. Raised before any mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown lock id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Disclosure attempted while the lock is Locked
    #[error("Access has not been requested for this lock")]
    NotRequested,

    /// Disclosure attempted before the delay elapsed
    #[error("Wait time not elapsed ({remaining_seconds}s remaining)")]
    WaitNotElapsed { remaining_seconds: u64 },

    /// Unseal failed. Wrong secret, tampered envelope and malformed input
    /// all collapse into this one variant.
    #[error("Decryption failed: invalid secret or corrupted data")]
    Decryption,

    /// Cryptographic primitive failure unrelated to caller input
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LaterlockError {
    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            LaterlockError::Validation(_) => "validation_error",
            LaterlockError::NotFound(_) => "not_found",
            LaterlockError::NotRequested => "not_requested",
            LaterlockError::WaitNotElapsed { .. } => "wait_not_elapsed",
            LaterlockError::Decryption => "decryption_failed",
            LaterlockError::Crypto(_) | LaterlockError::Storage(_) => "internal_error",
        }
    }

    /// Whether this is an internal failure whose detail must not reach callers.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            LaterlockError::Crypto(_) | LaterlockError::Storage(_)
        )
    }

    /// Whether this is a disclosure gate refusal.
    pub fn is_gate_violation(&self) -> bool {
        matches!(
            self,
            LaterlockError::NotRequested | LaterlockError::WaitNotElapsed { .. }
        )
    }
}

impl From<rusqlite::Error> for LaterlockError {
    fn from(err: rusqlite::Error) -> Self {
        LaterlockError::Storage(format!("SQLite error: {}", err))
    }
}

impl From<std::io::Error> for LaterlockError {
    fn from(err: std::io::Error) -> Self {
        LaterlockError::Storage(err.to_string())
    }
}
