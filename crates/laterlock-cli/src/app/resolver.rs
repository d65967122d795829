//! Path and secret resolution for config, database and system key.

use std::path::{Path, PathBuf};

use laterlock_core::crypto::SystemKey;

use crate::config::{default_config_path, default_keyfile_path, LaterlockConfig};
use crate::errors::CliError;
use crate::security::read_system_key;

/// Resolve the config file path from `--config` / `LATERLOCK_CONFIG` or the XDG default.
pub fn resolve_config_path(flag: Option<&str>) -> anyhow::Result<PathBuf> {
    match flag {
        Some(value) if !value.trim().is_empty() => Ok(PathBuf::from(value)),
        _ => default_config_path(),
    }
}

/// Resolve the database path: `--db` / `LATERLOCK_DB` first, then the config.
pub fn resolve_db_path(
    flag: Option<&str>,
    config: Option<&LaterlockConfig>,
    config_path: &Path,
) -> anyhow::Result<PathBuf> {
    if let Some(value) = flag.filter(|v| !v.trim().is_empty()) {
        return Ok(PathBuf::from(value));
    }
    if let Some(path) = config.and_then(|c| c.storage.path.as_deref()) {
        return Ok(PathBuf::from(path));
    }
    Err(CliError::not_found(
        missing_config_message(config_path),
        "Hint: Run `laterlock init` or pass --db <PATH>.",
    )
    .into())
}

/// Resolve the system key: `LATERLOCK_SYSTEM_KEY` first, then the key file.
///
/// Returns `None` when neither is available; only operations that need the
/// key will fail.
pub fn resolve_system_key(config: Option<&LaterlockConfig>) -> anyhow::Result<Option<SystemKey>> {
    if let Some(key) = SystemKey::from_env() {
        return Ok(Some(key));
    }

    let keyfile = match config.and_then(|c| c.security.system_key_file.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => default_keyfile_path()?,
    };
    if !keyfile.exists() {
        tracing::debug!(path = %keyfile.display(), "no system key file");
        return Ok(None);
    }
    read_system_key(&keyfile).map(Some)
}

/// Error message when no database has been configured.
pub fn missing_config_message(config_path: &Path) -> String {
    format!("No LaterLock database configured ({})", config_path.display())
}
