//! # LaterLock Core
//!
//! Core library for LaterLock: store content that can only be retrieved
//! after a delay has elapsed following an explicit request.
//!
//! This crate provides the sealing protocol, the disclosure gate and the
//! lock record store, independent of the CLI and HTTP surfaces.
//!
//! ## Architecture
//!
//! - **crypto**: envelope cipher (PBKDF2-HMAC-SHA-256 + AES-256-GCM)
//! - **resolver**: picks the key source for new locks
//! - **gate**: disclosure state machine and timing invariant
//! - **storage**: lock record store trait and SQLite backend
//! - **clock**: authoritative time source
//! - **service**: composes the above for callers
//!
//! Everything here is synchronous. Key derivation is CPU-bound, so async
//! callers should run core operations on a blocking thread.

pub mod clock;
pub mod crypto;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod service;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{LaterlockError, Result};
pub use gate::{Disclosure, DisclosureGate, DisclosureResponse, GateAction, GateOutcome, GateReceipt};
pub use resolver::{ContentLimits, CreateLockRequest, KeySourceResolver};
pub use service::LockService;
pub use storage::{LockId, LockState, LockStatus, LockStore, SealMode, SqliteLockStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
