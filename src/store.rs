//! Persistent record of created memes
//!
//! One JSON-encoded array lives under a single key of a pluggable key-value
//! backend. Every operation degrades instead of raising: a corrupt or
//! unreadable store reads as empty, failed writes report `false`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage key holding the created-meme array.
const STORE_KEY: &str = "created_memes";

/// A locally persisted reference to a previously generated meme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedMeme {
    /// Creation timestamp in milliseconds, doubling as the record id.
    pub id: i64,
    pub url: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Key-value storage port. Implementations must not panic; a failed
/// operation returns `None`/`false`.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// File-per-key storage under a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `dir`, creating the directory if
    /// needed.
    pub fn new(dir: &Path) -> Self {
        if let Err(e) = std::fs::create_dir_all(dir) {
            log::warn!("Failed to create storage directory: {}", e);
        }
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Default storage location: `<data dir>/meme_maker`.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meme_maker")
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        match std::fs::write(self.key_path(key), value) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to write storage key '{}': {}", key, e);
                false
            }
        }
    }

    fn remove(&self, key: &str) -> bool {
        let path = self.key_path(key);
        if !path.exists() {
            return true;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to remove storage key '{}': {}", key, e);
                false
            }
        }
    }
}

/// Append-with-delete record list of created memes over a storage backend.
pub struct MemeStore<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> MemeStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Append a record for `url`. Returns whether the write succeeded.
    pub fn save(&self, url: &str) -> bool {
        let now = Utc::now();
        let record = CreatedMeme {
            id: now.timestamp_millis(),
            url: url.to_string(),
            created_at: now.to_rfc3339(),
        };

        let mut records = self.list();
        records.push(record);

        match serde_json::to_string(&records) {
            Ok(json) => self.storage.set(STORE_KEY, &json),
            Err(e) => {
                log::warn!("Failed to serialize created memes: {}", e);
                false
            }
        }
    }

    /// All persisted records; empty on any read or parse fault.
    pub fn list(&self) -> Vec<CreatedMeme> {
        let Some(json) = self.storage.get(STORE_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&json) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Corrupt created-meme store, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Remove the record with the given id. Returns whether the resulting
    /// list was persisted.
    pub fn remove(&self, id: i64) -> bool {
        let records: Vec<CreatedMeme> = self.list().into_iter().filter(|m| m.id != id).collect();
        match serde_json::to_string(&records) {
            Ok(json) => self.storage.set(STORE_KEY, &json),
            Err(e) => {
                log::warn!("Failed to serialize created memes: {}", e);
                false
            }
        }
    }

    /// Drop the entire collection.
    pub fn clear(&self) -> bool {
        self.storage.remove(STORE_KEY)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
