//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use laterlock_core::LaterlockError;

use crate::ui::format::format_seconds;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, database, lock)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong passphrase, corrupted envelope)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Disclosure refused by the gate
    GateClosed { message: String, hint: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } | CliError::GateClosed { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Translate a core error into its user-facing form.
    ///
    /// Returns `None` for internal errors, which keep their own message and
    /// exit with the generic code.
    pub fn from_core(err: &LaterlockError, lock_id: Option<&str>) -> Option<Self> {
        let id = lock_id.unwrap_or("<id>");
        match err {
            LaterlockError::Validation(message) => Some(CliError::InvalidInput(message.clone())),
            LaterlockError::NotFound(_) => Some(CliError::not_found(
                format!("Lock not found: {}", id),
                "Hint: Lock IDs are case-sensitive. Check the ID you were given at creation.",
            )),
            LaterlockError::NotRequested => Some(CliError::GateClosed {
                message: "Access has not been requested for this lock".to_string(),
                hint: format!("Hint: Run `laterlock request {}` to start the countdown.", id),
            }),
            LaterlockError::WaitNotElapsed { remaining_seconds } => Some(CliError::GateClosed {
                message: format!(
                    "Wait time not elapsed: {} remaining",
                    format_seconds(*remaining_seconds)
                ),
                hint: format!("Hint: Run `laterlock show {}` to watch the countdown.", id),
            }),
            LaterlockError::Decryption => Some(CliError::auth_failed_with_hint(
                "Decryption failed: wrong passphrase or corrupted content",
                "Hint: Check your passphrase. Set LATERLOCK_PASSPHRASE to avoid the prompt.",
            )),
            LaterlockError::Crypto(_) | LaterlockError::Storage(_) => None,
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::GateClosed { .. } => exit_codes::GATE_CLOSED,
        }
    }
}
