//! Fault-injecting store wrapper for unit tests.

use super::{CacheConnection, CacheStore, MemoryCacheStore};
use async_trait::async_trait;
use readthrough_core::{ReadThroughError, ReadThroughResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Which operations fail with `CacheUnavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faults {
    pub connect: bool,
    pub get: bool,
    pub set: bool,
    pub close: bool,
}

/// Call counters shared by a store and all of its connections.
#[derive(Debug, Default)]
pub struct Calls {
    pub connects: AtomicUsize,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub closes: AtomicUsize,
    pub drops: AtomicUsize,
}

impl Calls {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

/// Wraps a [`MemoryCacheStore`], counting calls and injecting failures.
pub struct RecordingStore {
    pub inner: MemoryCacheStore,
    pub calls: Arc<Calls>,
    faults: Faults,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::with_faults(Faults::default())
    }

    pub fn with_faults(faults: Faults) -> Self {
        Self {
            inner: MemoryCacheStore::new(),
            calls: Arc::new(Calls::default()),
            faults,
        }
    }
}

#[async_trait]
impl CacheStore for RecordingStore {
    async fn connect(&self) -> ReadThroughResult<Box<dyn CacheConnection>> {
        self.calls.connects.fetch_add(1, Ordering::SeqCst);
        if self.faults.connect {
            return Err(ReadThroughError::cache_unavailable("connection refused"));
        }

        Ok(Box::new(RecordingConnection {
            inner: Some(self.inner.connect().await?),
            calls: Arc::clone(&self.calls),
            faults: self.faults,
        }))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct RecordingConnection {
    inner: Option<Box<dyn CacheConnection>>,
    calls: Arc<Calls>,
    faults: Faults,
}

impl RecordingConnection {
    fn inner(&mut self) -> ReadThroughResult<&mut Box<dyn CacheConnection>> {
        self.inner
            .as_mut()
            .ok_or_else(|| ReadThroughError::internal("connection already closed"))
    }
}

#[async_trait]
impl CacheConnection for RecordingConnection {
    async fn get(&mut self, key: &str) -> ReadThroughResult<Option<Vec<u8>>> {
        self.calls.gets.fetch_add(1, Ordering::SeqCst);
        if self.faults.get {
            return Err(ReadThroughError::cache_unavailable("get timed out"));
        }
        self.inner()?.get(key).await
    }

    async fn set(&mut self, key: &str, value: &[u8]) -> ReadThroughResult<()> {
        self.calls.sets.fetch_add(1, Ordering::SeqCst);
        if self.faults.set {
            return Err(ReadThroughError::cache_unavailable("set rejected"));
        }
        self.inner()?.set(key, value).await
    }

    async fn close(self: Box<Self>) -> ReadThroughResult<()> {
        let mut this = self;
        this.calls.closes.fetch_add(1, Ordering::SeqCst);
        if let Some(inner) = this.inner.take() {
            inner.close().await?;
        }
        if this.faults.close {
            return Err(ReadThroughError::cache_unavailable("quit failed"));
        }
        Ok(())
    }
}

impl Drop for RecordingConnection {
    fn drop(&mut self) {
        self.calls.drops.fetch_add(1, Ordering::SeqCst);
    }
}
