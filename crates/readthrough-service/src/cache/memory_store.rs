//! Process-local cache store.

use super::{CacheConnection, CacheStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use readthrough_core::ReadThroughResult;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type Entries = Arc<RwLock<HashMap<String, Vec<u8>>>>;

/// In-memory cache store, selected by a `memory://` address.
///
/// Clones share the same entries.
#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    entries: Entries,
}

impl MemoryCacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an entry without going through a connection.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// Returns a copy of the stored bytes for `key`.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn connect(&self) -> ReadThroughResult<Box<dyn CacheConnection>> {
        Ok(Box::new(MemoryCacheConnection {
            entries: Arc::clone(&self.entries),
        }))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct MemoryCacheConnection {
    entries: Entries,
}

#[async_trait]
impl CacheConnection for MemoryCacheConnection {
    async fn get(&mut self, key: &str) -> ReadThroughResult<Option<Vec<u8>>> {
        let value = self.entries.read().get(key).cloned();

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&mut self, key: &str, value: &[u8]) -> ReadThroughResult<()> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        debug!("Cached key '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    async fn close(self: Box<Self>) -> ReadThroughResult<()> {
        Ok(())
    }
}
