//! Parsing helpers for delays and lock IDs.

use laterlock_core::LockId;

use crate::errors::CliError;

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 1440;
const MINUTES_PER_WEEK: u64 = 10080;

/// Parse a delay such as `90`, `90m`, `12h`, `3d` or `1w` into minutes.
///
/// Bare numbers are minutes.
pub fn parse_delay(value: &str) -> anyhow::Result<u32> {
    let value = value.trim();
    let (num_str, multiplier) = match value.char_indices().last() {
        Some((idx, 'm')) => (&value[..idx], 1),
        Some((idx, 'h')) => (&value[..idx], MINUTES_PER_HOUR),
        Some((idx, 'd')) => (&value[..idx], MINUTES_PER_DAY),
        Some((idx, 'w')) => (&value[..idx], MINUTES_PER_WEEK),
        Some(_) => (value, 1),
        None => {
            return Err(CliError::invalid_input(
                "Delay cannot be empty (e.g. 90m, 12h, 3d, 1w)",
            )
            .into())
        }
    };

    let amount: u64 = num_str.trim().parse().map_err(|_| {
        CliError::invalid_input(format!(
            "Invalid delay: {} (expected <number>[m|h|d|w])",
            value
        ))
    })?;
    if amount == 0 {
        return Err(CliError::invalid_input(format!("Delay must be positive: {}", value)).into());
    }

    amount
        .checked_mul(multiplier)
        .and_then(|minutes| u32::try_from(minutes).ok())
        .ok_or_else(|| CliError::invalid_input(format!("Delay is too large: {}", value)).into())
}

/// Parse a lock ID argument.
pub fn parse_lock_id(value: &str) -> anyhow::Result<LockId> {
    LockId::parse(value.trim()).map_err(|_| {
        CliError::invalid_input(format!(
            "Invalid lock ID: {}\nHint: Lock IDs use only letters, digits, '-' and '_'.",
            value
        ))
        .into()
    })
}
