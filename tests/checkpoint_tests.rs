//! Checkpoint store tests
//!
//! Round trips, persistence across instances, and corruption detection.

use std::fs;

use tapstream::checkpoint::{CheckpointStore, FileCheckpointStore, MemoryCheckpointStore};
use tapstream::TapError;
use tempfile::TempDir;

// =============================================================================
// Memory Store Tests
// =============================================================================

#[test]
fn test_memory_store_round_trip() {
    let store = MemoryCheckpointStore::new();
    assert_eq!(store.load("app1").unwrap(), None);

    store.store("app1", 1234).unwrap();
    assert_eq!(store.load("app1").unwrap(), Some(1234));

    store.store("app1", 5678).unwrap();
    assert_eq!(store.load("app1").unwrap(), Some(5678));
}

#[test]
fn test_memory_store_nodes_are_independent() {
    let store = MemoryCheckpointStore::new();
    store.store("app1", 111).unwrap();
    store.store("app2", 222).unwrap();

    assert_eq!(store.load("app1").unwrap(), Some(111));
    assert_eq!(store.load("app2").unwrap(), Some(222));
    assert_eq!(store.load("app3").unwrap(), None);
}

// =============================================================================
// File Store Tests
// =============================================================================

#[test]
fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = FileCheckpointStore::open(dir.path()).unwrap();

    assert_eq!(store.load("app1").unwrap(), None);
    store.store("app1", 1234).unwrap();
    assert_eq!(store.load("app1").unwrap(), Some(1234));

    store.store("app1", 5678).unwrap();
    assert_eq!(store.load("app1").unwrap(), Some(5678));
}

#[test]
fn test_file_store_persists_across_instances() {
    let dir = TempDir::new().unwrap();

    FileCheckpointStore::open(dir.path())
        .unwrap()
        .store("app1", 1234)
        .unwrap();

    let reopened = FileCheckpointStore::open(dir.path()).unwrap();
    assert_eq!(reopened.load("app1").unwrap(), Some(1234));
}

#[test]
fn test_file_store_nodes_are_independent() {
    let dir = TempDir::new().unwrap();
    let store = FileCheckpointStore::open(dir.path()).unwrap();

    store.store("app1", 111).unwrap();
    store.store("app2", 222).unwrap();

    assert_eq!(store.load("app1").unwrap(), Some(111));
    assert_eq!(store.load("app2").unwrap(), Some(222));
}

#[test]
fn test_file_store_detects_corruption() {
    let dir = TempDir::new().unwrap();
    let store = FileCheckpointStore::open(dir.path()).unwrap();
    store.store("app1", 1234).unwrap();

    // flip one payload byte behind the CRC
    let path = dir.path().join("app1.ckpt");
    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    fs::write(&path, &bytes).unwrap();

    let err = store.load("app1").unwrap_err();
    assert!(matches!(err, TapError::Serialization(_)), "got: {}", err);
}

#[test]
fn test_file_store_rejects_truncated_record() {
    let dir = TempDir::new().unwrap();
    let store = FileCheckpointStore::open(dir.path()).unwrap();

    fs::write(dir.path().join("app1.ckpt"), [0u8, 1]).unwrap();

    let err = store.load("app1").unwrap_err();
    assert!(matches!(err, TapError::Serialization(_)));
}
