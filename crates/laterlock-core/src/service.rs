//! Lock service: creation, status and deletion around the disclosure gate.

use std::sync::Arc;

use crate::clock::Clock;
use crate::crypto::SystemKey;
use crate::error::{LaterlockError, Result};
use crate::gate::DisclosureGate;
use crate::resolver::{ContentLimits, CreateLockRequest, KeySourceResolver};
use crate::storage::{Lock, LockId, LockStatus, LockStore};

/// Entry point used by the CLI and the HTTP server.
///
/// Built once at startup from a ready store handle.
pub struct LockService<S: LockStore, C: Clock + Clone> {
    store: Arc<S>,
    clock: C,
    resolver: KeySourceResolver,
    gate: DisclosureGate<S, C>,
}

impl<S: LockStore, C: Clock + Clone> LockService<S, C> {
    pub fn new(store: Arc<S>, clock: C, system_key: Option<SystemKey>) -> Self {
        let gate = DisclosureGate::new(Arc::clone(&store), clock.clone(), system_key.clone());
        Self {
            store,
            clock,
            resolver: KeySourceResolver::new(system_key),
            gate,
        }
    }

    pub fn with_limits(mut self, limits: ContentLimits) -> Self {
        self.resolver = self.resolver.with_limits(limits);
        self
    }

    pub fn gate(&self) -> &DisclosureGate<S, C> {
        &self.gate
    }

    pub fn limits(&self) -> ContentLimits {
        self.resolver.limits()
    }

    /// Validate, seal if needed, and persist a new lock.
    ///
    /// # Errors
    ///
    /// Returns `LaterlockError::Validation` for bad input; nothing is written
    /// in that case.
    pub fn create(&self, request: CreateLockRequest) -> Result<LockStatus> {
        let new_lock = self.resolver.resolve(request)?;
        let now = self.clock.now();

        let lock = Lock {
            id: LockId::generate(),
            title: new_lock.title,
            sealed_content: new_lock.content.sealed_content,
            delay_minutes: new_lock.delay_minutes,
            salt: new_lock.content.salt,
            seal_mode: new_lock.content.seal_mode,
            created_at: now,
            access_requested_at: None,
            last_accessed: None,
        };
        self.store.insert_lock(&lock)?;

        tracing::info!(
            lock_id = %lock.id,
            seal_mode = %lock.seal_mode,
            delay_minutes = lock.delay_minutes,
            "lock created"
        );

        Ok(lock.status_at(now))
    }

    /// Public projection of a lock.
    pub fn status(&self, id: &LockId) -> Result<LockStatus> {
        let lock = self
            .store
            .get_lock(id)?
            .ok_or_else(|| LaterlockError::NotFound("Lock not found".to_string()))?;
        Ok(lock.status_at(self.clock.now()))
    }

    /// Remove a lock from any state. No tombstone is kept.
    pub fn delete(&self, id: &LockId) -> Result<()> {
        self.store.delete_lock(id).map_err(|e| match e {
            LaterlockError::NotFound(_) => LaterlockError::NotFound("Lock not found".to_string()),
            other => other,
        })?;
        tracing::info!(lock_id = %id, "lock deleted");
        Ok(())
    }
}
