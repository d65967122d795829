//! SQLite lock record store.
//!
//! One connection guarded by a mutex. Every trait method is a single SQL
//! statement, so each is atomic on its own. Timestamps are stored as integer
//! milliseconds since the Unix epoch.

mod row;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{LaterlockError, Result};
use crate::storage::traits::LockStore;
use crate::storage::types::{Lock, LockId};

use row::LockRow;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS locks (
    id TEXT PRIMARY KEY,
    title TEXT,
    content TEXT NOT NULL,
    delay_minutes INTEGER NOT NULL CHECK (delay_minutes > 0),
    salt TEXT NOT NULL,
    seal_mode TEXT NOT NULL CHECK (seal_mode IN ('passphrase', 'systemKey')),
    created_at INTEGER NOT NULL,
    access_requested_at INTEGER,
    last_accessed INTEGER
);
"#;

/// SQLite-backed lock store.
pub struct SqliteLockStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteLockStore {
    /// Open (or create) a database file and make sure the schema exists.
    ///
    /// Idempotent: opening an existing database leaves its rows untouched.
    ///
    /// # Errors
    ///
    /// Returns `LaterlockError::Storage` if the parent directory cannot be
    /// created or SQLite cannot open the file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LaterlockError::Storage(format!(
                        "Cannot create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        tracing::debug!(path = %path.display(), "opened lock store");

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    /// Database file path, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LaterlockError::Storage("SQLite connection poisoned".to_string()))
    }

    fn expect_one(affected: usize, id: &LockId) -> Result<()> {
        if affected == 0 {
            return Err(LaterlockError::NotFound(format!("Lock {}", id)));
        }
        Ok(())
    }
}

impl LockStore for SqliteLockStore {
    fn insert_lock(&self, lock: &Lock) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            &format!(
                "INSERT INTO locks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                LockRow::COLUMNS
            ),
            params![
                lock.id.as_str(),
                lock.title,
                lock.sealed_content.as_str(),
                i64::from(lock.delay_minutes),
                lock.salt.to_hex(),
                lock.seal_mode.as_str(),
                lock.created_at.timestamp_millis(),
                lock.access_requested_at.map(|t| t.timestamp_millis()),
                lock.last_accessed.map(|t| t.timestamp_millis()),
            ],
        )?;
        Ok(())
    }

    fn get_lock(&self, id: &LockId) -> Result<Option<Lock>> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM locks WHERE id = ?1", LockRow::COLUMNS),
                [id.as_str()],
                LockRow::from_sql,
            )
            .optional()?;

        row.map(Lock::try_from).transpose()
    }

    fn set_access_requested_at(&self, id: &LockId, at: Option<DateTime<Utc>>) -> Result<()> {
        let conn = self.lock_conn()?;
        let affected = conn.execute(
            "UPDATE locks SET access_requested_at = ?1 WHERE id = ?2",
            params![at.map(|t| t.timestamp_millis()), id.as_str()],
        )?;
        Self::expect_one(affected, id)
    }

    fn set_last_accessed(&self, id: &LockId, at: DateTime<Utc>) -> Result<()> {
        let conn = self.lock_conn()?;
        let affected = conn.execute(
            "UPDATE locks SET last_accessed = ?1 WHERE id = ?2",
            params![at.timestamp_millis(), id.as_str()],
        )?;
        Self::expect_one(affected, id)
    }

    fn delete_lock(&self, id: &LockId) -> Result<()> {
        let conn = self.lock_conn()?;
        let affected = conn.execute("DELETE FROM locks WHERE id = ?1", [id.as_str()])?;
        Self::expect_one(affected, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Envelope, Salt};
    use crate::storage::types::SealMode;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn sample_lock() -> Lock {
        Lock {
            id: LockId::generate(),
            title: Some("Birthday".to_string()),
            sealed_content: Envelope::new("ZGVmZ2hpamtsbW5vVsJ/Md2a6ZxjgncKuJWo0Q=="),
            delay_minutes: 90,
            salt: Salt::from_bytes([5u8; 16]),
            seal_mode: SealMode::Passphrase,
            created_at: at(1_700_000_000_123),
            access_requested_at: None,
            last_accessed: None,
        }
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let store = SqliteLockStore::open_in_memory().unwrap();
        let lock = sample_lock();
        store.insert_lock(&lock).unwrap();

        let loaded = store.get_lock(&lock.id).unwrap().unwrap();
        assert_eq!(loaded, lock);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = SqliteLockStore::open_in_memory().unwrap();
        assert!(store.get_lock(&LockId::generate()).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let store = SqliteLockStore::open_in_memory().unwrap();
        let lock = sample_lock();
        store.insert_lock(&lock).unwrap();
        let err = store.insert_lock(&lock).unwrap_err();
        assert!(matches!(err, LaterlockError::Storage(_)));
    }

    #[test]
    fn test_field_updates() {
        let store = SqliteLockStore::open_in_memory().unwrap();
        let lock = sample_lock();
        store.insert_lock(&lock).unwrap();

        store
            .set_access_requested_at(&lock.id, Some(at(5_000)))
            .unwrap();
        store.set_last_accessed(&lock.id, at(9_000)).unwrap();
        let loaded = store.get_lock(&lock.id).unwrap().unwrap();
        assert_eq!(loaded.access_requested_at, Some(at(5_000)));
        assert_eq!(loaded.last_accessed, Some(at(9_000)));

        store.set_access_requested_at(&lock.id, None).unwrap();
        let loaded = store.get_lock(&lock.id).unwrap().unwrap();
        assert_eq!(loaded.access_requested_at, None);
        assert_eq!(loaded.last_accessed, Some(at(9_000)));
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let store = SqliteLockStore::open_in_memory().unwrap();
        let id = LockId::generate();

        assert!(matches!(
            store.set_access_requested_at(&id, Some(at(1))),
            Err(LaterlockError::NotFound(_))
        ));
        assert!(matches!(
            store.set_last_accessed(&id, at(1)),
            Err(LaterlockError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_lock(&id),
            Err(LaterlockError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_record() {
        let store = SqliteLockStore::open_in_memory().unwrap();
        let lock = sample_lock();
        store.insert_lock(&lock).unwrap();
        store.delete_lock(&lock.id).unwrap();
        assert!(store.get_lock(&lock.id).unwrap().is_none());
        assert!(store.delete_lock(&lock.id).is_err());
    }
}
