//! Passphrase validation.
//!
//! Applied by the passphrase-holding client before it seals anything.
//! The server never sees the passphrase and so never runs this check.

use crate::error::{LaterlockError, Result};

/// Minimum passphrase length in characters.
pub const MIN_PASSPHRASE_LENGTH: usize = 6;

/// Validate passphrase meets minimum requirements.
///
/// # Requirements
///
/// - At least 6 characters long
/// - Not empty or only whitespace
///
/// # Examples
///
/// ```
/// use laterlock_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("correct-horse-battery").is_ok());
/// assert!(validate_passphrase("short").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(LaterlockError::Validation(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    let length = passphrase.chars().count();
    if length < MIN_PASSPHRASE_LENGTH {
        return Err(LaterlockError::Validation(format!(
            "Passphrase must be at least {} characters (got {})",
            MIN_PASSPHRASE_LENGTH, length
        )));
    }

    Ok(())
}
