//! Input handling helpers for passphrases and lock content.

use std::io::{self, IsTerminal, Read};

use dialoguer::{Confirm, Input, Password};
use laterlock_core::crypto::validate_passphrase;
use zeroize::Zeroizing;

use crate::constants::env_vars;
use crate::errors::CliError;

fn passphrase_from_env() -> Option<Zeroizing<String>> {
    std::env::var(env_vars::PASSPHRASE)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(Zeroizing::new)
}

/// Prompt for the passphrase of an existing lock, or read LATERLOCK_PASSPHRASE.
pub fn prompt_passphrase(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = passphrase_from_env() {
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No passphrase provided and no TTY available. Set {}.",
            env_vars::PASSPHRASE
        ))
        .into());
    }
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Prompt for a new passphrase with confirmation, or read LATERLOCK_PASSPHRASE.
pub fn prompt_new_passphrase(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = passphrase_from_env() {
        validate_passphrase(&value).map_err(|e| {
            CliError::invalid_input(format!("Passphrase does not meet requirements: {}", e))
        })?;
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No passphrase provided and no TTY available. Set {}.",
            env_vars::PASSPHRASE
        ))
        .into());
    }
    loop {
        let passphrase = Zeroizing::new(
            Password::new()
                .with_prompt("Enter passphrase")
                .with_confirmation("Confirm passphrase", "Passphrases do not match")
                .interact()
                .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?,
        );
        if let Err(err) = validate_passphrase(&passphrase) {
            eprintln!("Passphrase does not meet requirements: {}", err);
            continue;
        }
        return Ok(passphrase);
    }
}

/// Read lock content from --content, piped stdin, or an interactive prompt.
pub fn read_content(no_input: bool, content: Option<String>) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = content {
        if value.trim().is_empty() {
            return Err(CliError::invalid_input("--content cannot be empty").into());
        }
        return Ok(Zeroizing::new(value));
    }

    if !io::stdin().is_terminal() {
        let mut buffer = Zeroizing::new(String::new());
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = Zeroizing::new(buffer.trim_end().to_string());
        if trimmed.is_empty() {
            return Err(CliError::invalid_input("No content provided on stdin").into());
        }
        return Ok(trimmed);
    }

    if no_input {
        return Err(
            CliError::invalid_input("--no-input requires --content or content on stdin").into(),
        );
    }

    Input::<String>::new()
        .with_prompt("Content")
        .interact_text()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read content: {}", e))
}

/// Ask for confirmation before an irreversible action.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}
