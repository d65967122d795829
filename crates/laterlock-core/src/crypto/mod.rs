//! Envelope cipher for LaterLock.
//!
//! This module provides sealing and unsealing services using
//! well-audited RustCrypto primitives:
//! - **PBKDF2-HMAC-SHA-256** (600,000 iterations) for key derivation
//! - **AES-256-GCM** for authenticated encryption
//!
//! ## Security Model
//!
//! - Content is sealed under either a user passphrase (the passphrase never
//!   reaches the server) or a process-wide system key
//! - Every seal uses a fresh 16-byte salt and 12-byte nonce
//! - Derived keys are zeroized from memory on drop
//! - Unseal failures are uniform: wrong secret, tampering and malformed
//!   input produce the same error
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the lock database
//! - Release of content before its delay elapses (see `gate`)
//!
//! We do NOT defend against:
//! - An operator who controls the server process and also observes
//!   passphrases typed into server-rendered forms

pub mod envelope;
pub mod key;
pub mod passphrase;
pub mod system_key;

pub use envelope::{
    seal, seal_with_key, unseal, unseal_with_key, Envelope, Sealed, NONCE_LENGTH, TAG_LENGTH,
};
pub use key::{derive_key, DerivedKey, Salt, KEY_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH};
pub use passphrase::validate_passphrase;
pub use system_key::SystemKey;
