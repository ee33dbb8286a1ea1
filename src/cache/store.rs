//! The external cache contract and an in-memory implementation.

use crate::cache::key::CacheKey;
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::Mutex;

/// External key-value store holding serialized fragments.
///
/// The engine issues `get`, `put`, and `batch_get` and assumes each call
/// is atomic from its own perspective. Nothing on this side serializes
/// concurrent writers to the same key: two callers racing to fill a
/// missing key may both compute and both write, and the last write wins.
/// Callers sharing a store across threads get exactly the safety the
/// store's own read/write pair provides; no extra locking is layered on
/// top.
pub trait CacheStore {
    /// Fetch the fragment stored under `key`, if any.
    fn get(&self, key: &CacheKey) -> Result<Option<String>, StoreError>;

    /// Store `fragment` under `key`, replacing any previous value.
    fn put(&self, key: &CacheKey, fragment: &str) -> Result<(), StoreError>;

    /// One read covering all of `keys`; absent keys are left out of the
    /// result. The default just loops `get` - backends with a real
    /// multi-read should override it.
    fn batch_get(&self, keys: &[CacheKey]) -> Result<HashMap<CacheKey, String>, StoreError> {
        let mut found = HashMap::new();
        for key in keys {
            if let Some(fragment) = self.get(key)? {
                found.insert(key.clone(), fragment);
            }
        }
        Ok(found)
    }
}

/// In-memory store for tests and single-process hosts.
///
/// Each operation takes the lock once, so individual reads and writes are
/// atomic; a get/put pair spanning two calls is not.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        MemoryCache::default()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::from(e.to_string()))?;
        Ok(entries.get(key.as_str()).cloned())
    }

    fn put(&self, key: &CacheKey, fragment: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::from(e.to_string()))?;
        entries.insert(key.as_str().to_string(), fragment.to_string());
        Ok(())
    }
}
