//! UI primitives for the LaterLock CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens, owo-colors styles, spinner frames
//! - **Render**: Headers, receipts, hints, key-value lines, errors
//! - **Progress**: Spinner shown while keys are derived
//! - **Format**: Delay and countdown formatting
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{UiContext, render::{header, kv, hint}};
//!
//! let ctx = UiContext::from_env(cli.json, cli.plain, cli.no_color, cli.ascii);
//!
//! if ctx.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! println!("{}", header(&ctx, "show", Some(id)));
//! println!("{}", kv(&ctx, "State", "pending"));
//! println!("{}", hint(&ctx, "laterlock view <id>"));
//! ```

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use render::{divider, header, hint, kv, print, receipt};

pub use progress::Spinner;
