//! Application context for the LaterLock CLI.
//!
//! Bundles CLI arguments with the lazily-loaded config file so handlers
//! don't re-read it or thread paths through every call.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use laterlock_core::{LockService, SqliteLockStore, SystemClock};

use crate::cli::Cli;
use crate::config::{read_config, LaterlockConfig};
use crate::ui::UiContext;

use super::resolver::{resolve_config_path, resolve_db_path, resolve_system_key};

/// Service type used by every command.
pub type CliService = LockService<SqliteLockStore, SystemClock>;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<LaterlockConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn no_input(&self) -> bool {
        self.cli.no_input
    }

    pub fn ui_context(&self) -> UiContext {
        UiContext::from_env(self.cli.json, self.cli.plain, self.cli.no_color, self.cli.ascii)
    }

    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        resolve_config_path(self.cli.config.as_deref())
    }

    /// The config file, if one exists. Loaded at most once.
    pub fn config(&self) -> anyhow::Result<Option<&LaterlockConfig>> {
        let config = self.config.get_or_try_init(|| {
            let path = self.config_path()?;
            if path.exists() {
                read_config(&path).map(Some)
            } else {
                Ok::<_, anyhow::Error>(None)
            }
        })?;
        Ok(config.as_ref())
    }

    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        let config_path = self.config_path()?;
        resolve_db_path(self.cli.db.as_deref(), self.config()?, &config_path)
    }

    /// Open the store and build the service. This is the single startup
    /// step that constructs the storage handle.
    pub fn open_service(&self) -> anyhow::Result<CliService> {
        let db_path = self.db_path()?;
        let system_key = resolve_system_key(self.config()?)?;
        tracing::debug!(
            db = %db_path.display(),
            system_key = system_key.is_some(),
            "opening lock store"
        );
        let store = SqliteLockStore::open(&db_path)?;
        Ok(LockService::new(Arc::new(store), SystemClock, system_key))
    }
}
