use std::sync::Arc;

use laterlock_core::{CreateLockRequest, LockService, LockStore, SqliteLockStore, SystemClock};
use tempfile::tempdir;

fn sealed_request() -> CreateLockRequest {
    CreateLockRequest {
        title: Some("On disk".to_string()),
        delay_minutes: Some(1440),
        encrypted_content: Some("ZGVmZ2hpamtsbW5vVsJ/Md2a6ZxjgncKuJWo0Q==".to_string()),
        salt: Some("000102030405060708090a0b0c0d0e0f".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_open_creates_parent_directories() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("deeper").join("laterlock.db");

    let store = SqliteLockStore::open(&path).expect("open should succeed");
    assert!(path.exists());
    assert_eq!(store.path(), Some(path.as_path()));
}

#[test]
fn test_reopen_is_idempotent_and_keeps_rows() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("laterlock.db");

    let created = {
        let store = Arc::new(SqliteLockStore::open(&path).expect("first open"));
        let service = LockService::new(store, SystemClock, None);
        service.create(sealed_request()).expect("create")
    };

    let store = SqliteLockStore::open(&path).expect("second open");
    let lock = store
        .get_lock(&created.id)
        .expect("get should succeed")
        .expect("lock should survive reopen");
    assert_eq!(lock.title.as_deref(), Some("On disk"));
    assert_eq!(lock.delay_minutes, 1440);
    assert_eq!(lock.created_at.timestamp_millis(), created.created_at);
}

#[test]
fn test_sealed_content_is_never_plaintext_on_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("laterlock.db");
    let store = Arc::new(SqliteLockStore::open(&path).expect("open"));
    let key = laterlock_core::crypto::SystemKey::new("disk-test-key").unwrap();
    let service = LockService::new(store, SystemClock, Some(key));

    service
        .create(CreateLockRequest {
            content: Some("plaintext-marker-7f3a".to_string()),
            delay_minutes: Some(1),
            ..Default::default()
        })
        .expect("create");
    drop(service);

    let mut on_disk = std::fs::read(&path).expect("read db");
    for suffix in ["-wal", "-shm"] {
        let side = dir.path().join(format!("laterlock.db{}", suffix));
        if let Ok(bytes) = std::fs::read(side) {
            on_disk.extend(bytes);
        }
    }
    let needle = b"plaintext-marker-7f3a";
    assert!(!on_disk.windows(needle.len()).any(|w| w == needle));
}
