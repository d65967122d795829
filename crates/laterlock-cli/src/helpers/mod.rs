//! Input and parsing helper functions for the CLI.
//!
//! This module provides utilities for:
//! - Passphrase prompting and content reading (`input`)
//! - Delay and lock ID parsing (`parsing`)

mod input;
mod parsing;

pub use input::{confirm, prompt_new_passphrase, prompt_passphrase, read_content};
pub use parsing::{parse_delay, parse_lock_id};
