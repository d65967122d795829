//! Lock record store trait definition.
//!
//! The `LockStore` trait is everything the disclosure gate and the lock
//! service need from persistence. Each method is a single atomic operation
//! keyed by lock id; nothing spans more than one lock.

use chrono::{DateTime, Utc};

use super::types::{Lock, LockId};
use crate::error::Result;

/// Storage interface for lock records.
///
/// All implementations must ensure:
/// - Each method applies fully or not at all
/// - A missing id is reported as `LaterlockError::NotFound`, distinct from
///   backend failures
/// - Sealed content is stored exactly as given, never as plaintext
pub trait LockStore: Send + Sync {
    /// Insert a fully formed new lock.
    ///
    /// # Errors
    ///
    /// Returns `LaterlockError::Storage` if the id already exists or the
    /// backend fails.
    fn insert_lock(&self, lock: &Lock) -> Result<()>;

    /// Get a lock by id.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(lock))` if found, `Ok(None)` if not found.
    fn get_lock(&self, id: &LockId) -> Result<Option<Lock>>;

    /// Set or clear `access_requested_at`.
    ///
    /// # Errors
    ///
    /// Returns `LaterlockError::NotFound` if no lock has this id.
    fn set_access_requested_at(&self, id: &LockId, at: Option<DateTime<Utc>>) -> Result<()>;

    /// Record a successful disclosure.
    ///
    /// # Errors
    ///
    /// Returns `LaterlockError::NotFound` if no lock has this id.
    fn set_last_accessed(&self, id: &LockId, at: DateTime<Utc>) -> Result<()>;

    /// Remove a lock entirely.
    ///
    /// # Errors
    ///
    /// Returns `LaterlockError::NotFound` if no lock has this id.
    fn delete_lock(&self, id: &LockId) -> Result<()>;
}

impl<S: LockStore + ?Sized> LockStore for std::sync::Arc<S> {
    fn insert_lock(&self, lock: &Lock) -> Result<()> {
        (**self).insert_lock(lock)
    }

    fn get_lock(&self, id: &LockId) -> Result<Option<Lock>> {
        (**self).get_lock(id)
    }

    fn set_access_requested_at(&self, id: &LockId, at: Option<DateTime<Utc>>) -> Result<()> {
        (**self).set_access_requested_at(id, at)
    }

    fn set_last_accessed(&self, id: &LockId, at: DateTime<Utc>) -> Result<()> {
        (**self).set_last_accessed(id, at)
    }

    fn delete_lock(&self, id: &LockId) -> Result<()> {
        (**self).delete_lock(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_dyn_store(_store: &dyn LockStore) {}
    }
}
