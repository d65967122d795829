//! Lock row type for database queries.

use chrono::{DateTime, Utc};

use crate::crypto::{Envelope, Salt};
use crate::error::{LaterlockError, Result};
use crate::storage::types::{Lock, LockId, SealMode};

/// Raw row data from the locks table, before parsing into domain types.
#[derive(Debug)]
pub struct LockRow {
    pub id: String,
    pub title: Option<String>,
    pub content: String,
    pub delay_minutes: i64,
    pub salt: String,
    pub seal_mode: String,
    pub created_at: i64,
    pub access_requested_at: Option<i64>,
    pub last_accessed: Option<i64>,
}

impl LockRow {
    pub const COLUMNS: &'static str = "id, title, content, delay_minutes, salt, seal_mode, \
                                        created_at, access_requested_at, last_accessed";

    pub fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            delay_minutes: row.get(3)?,
            salt: row.get(4)?,
            seal_mode: row.get(5)?,
            created_at: row.get(6)?,
            access_requested_at: row.get(7)?,
            last_accessed: row.get(8)?,
        })
    }
}

fn timestamp(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| LaterlockError::Storage(format!("Invalid timestamp: {}", millis)))
}

impl TryFrom<LockRow> for Lock {
    type Error = LaterlockError;

    fn try_from(row: LockRow) -> Result<Self> {
        let id = LockId::parse(&row.id)
            .map_err(|e| LaterlockError::Storage(format!("Invalid lock id: {}", e)))?;
        let delay_minutes = u32::try_from(row.delay_minutes)
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| {
                LaterlockError::Storage(format!("Invalid delay_minutes: {}", row.delay_minutes))
            })?;
        let salt = Salt::from_hex(&row.salt)
            .map_err(|e| LaterlockError::Storage(format!("Invalid salt: {}", e)))?;
        let seal_mode: SealMode = row.seal_mode.parse()?;

        Ok(Lock {
            id,
            title: row.title,
            sealed_content: Envelope::new(row.content),
            delay_minutes,
            salt,
            seal_mode,
            created_at: timestamp(row.created_at)?,
            access_requested_at: row.access_requested_at.map(timestamp).transpose()?,
            last_accessed: row.last_accessed.map(timestamp).transpose()?,
        })
    }
}
