//! Application-level utilities for the LaterLock CLI.
//!
//! This module provides:
//! - Application context for unified CLI + config handling
//! - Path resolution for config and database files
//! - System key resolution

mod context;
mod resolver;

pub use context::{AppContext, CliService};
