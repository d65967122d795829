//! Command handlers, one module per command group.

pub mod init;
pub mod locks;
pub mod misc;
