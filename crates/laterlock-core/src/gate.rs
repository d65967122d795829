//! Disclosure gate.
//!
//! Per-lock state machine:
//!
//! ```text
//!            request_access             clock passes deadline
//!   Locked ─────────────────▶ Pending ─────────────────────────▶ Eligible
//!     ▲                         │                                   │
//!     └──── cancel_request / re_lock ◀──────────────────────────────┘
//! ```
//!
//! The state is never stored. Every call reads the record and the clock and
//! derives it again, so a stale client countdown can never authorize a
//! disclosure.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::crypto::{Envelope, Salt, SystemKey};
use crate::error::{LaterlockError, Result};
use crate::storage::{Lock, LockId, LockState, LockStore, SealMode};

/// Client actions accepted on a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateAction {
    RequestAccess,
    CancelRequest,
    ReLock,
    ViewContent,
}

impl GateAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateAction::RequestAccess => "request_access",
            GateAction::CancelRequest => "cancel_request",
            GateAction::ReLock => "re_lock",
            GateAction::ViewContent => "view_content",
        }
    }
}

impl fmt::Display for GateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GateAction {
    type Err = LaterlockError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "request_access" => Ok(GateAction::RequestAccess),
            "cancel_request" => Ok(GateAction::CancelRequest),
            "re_lock" => Ok(GateAction::ReLock),
            "view_content" => Ok(GateAction::ViewContent),
            _ => Err(LaterlockError::Validation(
                "Invalid action specified".to_string(),
            )),
        }
    }
}

/// Result of a state-changing action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateReceipt {
    pub action: GateAction,
    pub message: String,
    pub state: String,
    pub remaining_milliseconds: u64,
    /// Downstream hint that any content already shown should be hidden again.
    pub conceal_disclosed: bool,
}

impl GateReceipt {
    fn new(action: GateAction, message: &str, state: LockState) -> Self {
        Self {
            action,
            message: message.to_string(),
            state: state.name().to_string(),
            remaining_milliseconds: state.remaining_ms(),
            conceal_disclosed: matches!(action, GateAction::ReLock),
        }
    }
}

/// Content released by a successful disclosure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disclosure {
    /// System-key path: unsealed on the server.
    Plaintext(String),
    /// Passphrase path: returned as stored for the caller to unseal.
    Sealed { envelope: Envelope, salt: Salt },
}

impl Disclosure {
    pub fn seal_mode(&self) -> SealMode {
        match self {
            Disclosure::Plaintext(_) => SealMode::SystemKey,
            Disclosure::Sealed { .. } => SealMode::Passphrase,
        }
    }

    /// Wire shape: `{ content, sealMode, isEncrypted, salt? }`.
    pub fn to_response(&self) -> DisclosureResponse {
        match self {
            Disclosure::Plaintext(content) => DisclosureResponse {
                content: content.clone(),
                seal_mode: SealMode::SystemKey,
                is_encrypted: false,
                salt: None,
            },
            Disclosure::Sealed { envelope, salt } => DisclosureResponse {
                content: envelope.as_str().to_string(),
                seal_mode: SealMode::Passphrase,
                is_encrypted: true,
                salt: Some(salt.to_hex()),
            },
        }
    }
}

/// Serialized form of a [`Disclosure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureResponse {
    pub content: String,
    pub seal_mode: SealMode,
    pub is_encrypted: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub salt: Option<String>,
}

/// Outcome of [`DisclosureGate::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Receipt(GateReceipt),
    Disclosed(Disclosure),
}

/// Server-authoritative gate over a lock store.
pub struct DisclosureGate<S: LockStore, C: Clock> {
    store: Arc<S>,
    clock: C,
    system_key: Option<SystemKey>,
}

impl<S: LockStore, C: Clock> DisclosureGate<S, C> {
    pub fn new(store: Arc<S>, clock: C, system_key: Option<SystemKey>) -> Self {
        Self {
            store,
            clock,
            system_key,
        }
    }

    fn load(&self, id: &LockId) -> Result<Lock> {
        self.store
            .get_lock(id)?
            .ok_or_else(|| LaterlockError::NotFound("Lock not found".to_string()))
    }

    /// Current state of a lock.
    pub fn status(&self, id: &LockId) -> Result<LockState> {
        let lock = self.load(id)?;
        Ok(lock.state_at(self.clock.now()))
    }

    /// Start (or restart) the countdown.
    pub fn request_access(&self, id: &LockId) -> Result<GateReceipt> {
        let lock = self.load(id)?;
        let now = self.clock.now();
        self.store.set_access_requested_at(id, Some(now))?;

        let state = LockState::Pending {
            remaining_ms: lock.delay_millis().unsigned_abs(),
        };
        tracing::info!(lock_id = %id, delay_minutes = lock.delay_minutes, "access requested");

        Ok(GateReceipt::new(
            GateAction::RequestAccess,
            "Access request recorded",
            state,
        ))
    }

    /// Return to Locked.
    pub fn cancel_request(&self, id: &LockId) -> Result<GateReceipt> {
        self.clear_request(id, GateAction::CancelRequest, "Access request canceled")
    }

    /// Return to Locked and ask downstream to hide anything already shown.
    pub fn re_lock(&self, id: &LockId) -> Result<GateReceipt> {
        self.clear_request(id, GateAction::ReLock, "Content re-locked successfully")
    }

    fn clear_request(&self, id: &LockId, action: GateAction, message: &str) -> Result<GateReceipt> {
        self.store.set_access_requested_at(id, None)?;
        tracing::info!(lock_id = %id, action = %action, "access request cleared");
        Ok(GateReceipt::new(action, message, LockState::Locked))
    }

    /// Release content if and only if the delay has elapsed right now.
    ///
    /// # Errors
    ///
    /// - `LaterlockError::NotFound` if the lock does not exist
    /// - `LaterlockError::NotRequested` if the lock is Locked
    /// - `LaterlockError::WaitNotElapsed` with the remaining seconds,
    ///   rounded up, if the lock is Pending
    /// - `LaterlockError::Decryption` if system-key content fails to unseal
    ///
    /// On any error the record is left unchanged.
    pub fn disclose(&self, id: &LockId) -> Result<Disclosure> {
        let lock = self.load(id)?;
        let now = self.clock.now();

        match lock.state_at(now) {
            LockState::Locked => {
                tracing::warn!(lock_id = %id, "disclosure refused: not requested");
                return Err(LaterlockError::NotRequested);
            }
            LockState::Pending { remaining_ms } => {
                let remaining_seconds = remaining_ms.div_ceil(1000);
                tracing::warn!(lock_id = %id, remaining_seconds, "disclosure refused: wait not elapsed");
                return Err(LaterlockError::WaitNotElapsed { remaining_seconds });
            }
            LockState::Eligible => {}
        }

        let disclosure = match lock.seal_mode {
            SealMode::Passphrase => Disclosure::Sealed {
                envelope: lock.sealed_content,
                salt: lock.salt,
            },
            SealMode::SystemKey => {
                let system_key = self.system_key.as_ref().ok_or_else(|| {
                    LaterlockError::Crypto("System key is not configured".to_string())
                })?;
                let plaintext = system_key
                    .unseal(&lock.sealed_content, &lock.salt)
                    .inspect_err(|_| {
                        tracing::error!(lock_id = %id, "system-key content failed to unseal");
                    })?;
                Disclosure::Plaintext(plaintext)
            }
        };

        self.store.set_last_accessed(id, now)?;
        tracing::info!(lock_id = %id, seal_mode = %lock.seal_mode, "content disclosed");

        Ok(disclosure)
    }

    /// Dispatch a wire action.
    pub fn apply(&self, id: &LockId, action: GateAction) -> Result<GateOutcome> {
        match action {
            GateAction::RequestAccess => self.request_access(id).map(GateOutcome::Receipt),
            GateAction::CancelRequest => self.cancel_request(id).map(GateOutcome::Receipt),
            GateAction::ReLock => self.re_lock(id).map(GateOutcome::Receipt),
            GateAction::ViewContent => self.disclose(id).map(GateOutcome::Disclosed),
        }
    }
}
