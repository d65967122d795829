//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, database, lock).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong passphrase, corrupted envelope).
    pub const AUTH_FAILED: i32 = 5;

    /// Disclosure refused: access not requested or wait not elapsed.
    pub const GATE_CLOSED: i32 = 6;
}

/// Environment variables read by the CLI.
pub mod env_vars {
    /// Passphrase for sealing or unsealing passphrase-path locks.
    pub const PASSPHRASE: &str = "LATERLOCK_PASSPHRASE";

    /// Log filter, takes precedence over `RUST_LOG`.
    pub const LOG: &str = "LATERLOCK_LOG";
}

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Largest request body the HTTP server accepts.
pub const MAX_BODY_BYTES: usize = 16 * 1024;
