//! Tests for the created-meme store.

use std::cell::RefCell;
use std::collections::HashMap;

use tempfile::TempDir;

use super::{CreatedMeme, FileStorage, MemeStore, StorageBackend, STORE_KEY};

/// In-memory backend standing in for real key-value storage.
#[derive(Default)]
struct MemoryStorage {
    map: RefCell<HashMap<String, String>>,
    fail_writes: bool,
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        if self.fail_writes {
            return false;
        }
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        if self.fail_writes {
            return false;
        }
        self.map.borrow_mut().remove(key);
        true
    }
}

fn memory_store() -> MemeStore<MemoryStorage> {
    MemeStore::new(MemoryStorage::default())
}

// ── round-trip ───────────────────────────────────────────────────────

#[test]
fn save_then_list_round_trip() {
    let store = memory_store();

    assert!(store.save("https://i.imgflip.com/abc.jpg"));

    let records = store.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, "https://i.imgflip.com/abc.jpg");
    assert!(records[0].id > 0);
    assert!(!records[0].created_at.is_empty());
}

#[test]
fn save_appends_in_order() {
    let store = memory_store();
    store.save("first");
    store.save("second");
    store.save("third");

    let urls: Vec<String> = store.list().into_iter().map(|m| m.url).collect();
    assert_eq!(urls, vec!["first", "second", "third"]);
}

#[test]
fn remove_by_id_leaves_rest() {
    let store = memory_store();
    store.save("keep me");
    // Ids are millisecond timestamps; space the saves so they differ.
    std::thread::sleep(std::time::Duration::from_millis(5));
    store.save("drop me");

    let records = store.list();
    let drop_id = records
        .iter()
        .find(|m| m.url == "drop me")
        .map(|m| m.id)
        .unwrap();

    assert!(store.remove(drop_id));
    let remaining = store.list();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].url, "keep me");
}

#[test]
fn remove_only_record_empties_list() {
    let store = memory_store();
    store.save("only");
    let id = store.list()[0].id;

    assert!(store.remove(id));
    assert!(store.list().is_empty());
}

#[test]
fn remove_unknown_id_is_a_no_op_write() {
    let store = memory_store();
    store.save("survivor");

    assert!(store.remove(-1));
    assert_eq!(store.list().len(), 1);
}

#[test]
fn clear_after_several_saves_empties_list() {
    let store = memory_store();
    store.save("a");
    store.save("b");
    store.save("c");

    assert!(store.clear());
    assert!(store.list().is_empty());
}

// ── corruption resilience ────────────────────────────────────────────

#[test]
fn corrupt_state_reads_as_empty() {
    let storage = MemoryStorage::default();
    storage.set(STORE_KEY, "{ not valid json");
    let store = MemeStore::new(storage);

    assert!(store.list().is_empty());
}

#[test]
fn corrupt_state_is_replaced_by_next_save() {
    let storage = MemoryStorage::default();
    storage.set(STORE_KEY, "]]]]");
    let store = MemeStore::new(storage);

    assert!(store.save("fresh"));
    let records = store.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, "fresh");
}

#[test]
fn wrong_shape_json_reads_as_empty() {
    let storage = MemoryStorage::default();
    storage.set(STORE_KEY, r#"{"id": 1, "url": "not-an-array"}"#);
    let store = MemeStore::new(storage);

    assert!(store.list().is_empty());
}

#[test]
fn failed_write_reports_false() {
    let storage = MemoryStorage {
        fail_writes: true,
        ..MemoryStorage::default()
    };
    let store = MemeStore::new(storage);

    assert!(!store.save("nope"));
    assert!(!store.clear());
}

// ── file backend ─────────────────────────────────────────────────────

#[test]
fn file_storage_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = MemeStore::new(FileStorage::new(dir.path()));

    assert!(store.save("https://i.imgflip.com/xyz.jpg"));
    let records = store.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, "https://i.imgflip.com/xyz.jpg");

    assert!(store.clear());
    assert!(store.list().is_empty());
}

#[test]
fn file_storage_survives_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let store = MemeStore::new(FileStorage::new(dir.path()));
        store.save("persisted");
    }

    let store = MemeStore::new(FileStorage::new(dir.path()));
    assert_eq!(store.list()[0].url, "persisted");
}

#[test]
fn file_storage_corrupt_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("created_memes.json"), "garbage!").unwrap();

    let store = MemeStore::new(FileStorage::new(dir.path()));
    assert!(store.list().is_empty());
}

#[test]
fn file_storage_clear_without_file_succeeds() {
    let dir = TempDir::new().unwrap();
    let store = MemeStore::new(FileStorage::new(dir.path()));
    assert!(store.clear());
}

#[test]
fn records_serialize_with_camel_case_created_at() {
    let record = CreatedMeme {
        id: 1700000000000,
        url: "u".to_string(),
        created_at: "2023-11-14T22:13:20+00:00".to_string(),
    };
    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"createdAt\""));

    let back: CreatedMeme = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
