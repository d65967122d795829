//! Lock record store: the entity shape, the store contract and its SQLite
//! implementation.

mod sqlite;
mod traits;
mod types;

pub use sqlite::SqliteLockStore;
pub use traits::LockStore;
pub use types::{
    Lock, LockId, LockState, LockStatus, SealMode, LOCK_ID_LENGTH, MAX_LOCK_ID_LENGTH,
};
