//! Local key-value persistence and the windowed history cache built on it.
//!
//! The store is synchronous from the tracker's point of view: a browser's
//! `localStorage`, a directory of files, or a map in memory.

pub mod cache;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(feature = "wasm")]
pub mod local;

pub use cache::{CacheEntry, WindowedCache};
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(feature = "wasm")]
pub use local::LocalStorage;

use crate::error::StorageError;
use std::collections::HashMap;
use std::sync::RwLock;

/// String key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
            .remove(key);
        Ok(())
    }
}
