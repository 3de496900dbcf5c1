//! In-memory repository for testing.
//!
//! Stores the serialized JSON bytes in a shared HashMap keyed by path,
//! avoiding file system I/O entirely. Clones share the same storage, so
//! a test can hand the same repository to the session and its assertions.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use serde_json::Value;

use crate::{
    Result,
    error::Error,
    history::GameHistory,
    knowledge::KnowledgeBase,
    ports::{HistoryRepository, KnowledgeRepository},
};

/// In-memory repository for both stores.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn count(&self) -> usize {
        self.storage.lock().unwrap().len()
    }

    /// Clear all stored entries.
    pub fn clear(&self) {
        self.storage.lock().unwrap().clear();
    }

    /// Check if something has been saved at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        let key = path.to_string_lossy().to_string();
        self.storage.lock().unwrap().contains_key(&key)
    }

    fn put(&self, path: &Path, bytes: Vec<u8>) {
        let key = path.to_string_lossy().to_string();
        self.storage.lock().unwrap().insert(key, bytes);
    }

    fn get(&self, path: &Path) -> Result<Vec<u8>> {
        let key = path.to_string_lossy().to_string();
        self.storage
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::Io {
                operation: format!("load from in-memory storage at {path:?}"),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "key not found in memory",
                ),
            })
    }
}

impl KnowledgeRepository for InMemoryRepository {
    fn save(&self, kb: &KnowledgeBase, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(kb)?;
        self.put(path, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<KnowledgeBase> {
        let bytes = self.get(path)?;
        let raw: serde_json::Map<String, Value> = serde_json::from_slice(&bytes)?;
        Ok(KnowledgeBase::from_raw(raw))
    }
}

impl HistoryRepository for InMemoryRepository {
    fn save(&self, history: &GameHistory, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(history)?;
        self.put(path, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<GameHistory> {
        let bytes = self.get(path)?;
        let raw: Vec<Value> = serde_json::from_slice(&bytes)?;
        Ok(GameHistory::from_raw(raw))
    }
}
