//! Cache store abstractions and implementations.
//!
//! Stores hand out scoped connections; callers release each connection
//! exactly once on every exit path.

mod cache_store;
mod memcached_store;
mod memory_store;
mod redis_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache_store::{release, CacheConnection, CacheConnectionExt, CacheStore};
pub use memcached_store::MemcachedCacheStore;
pub use memory_store::MemoryCacheStore;
pub use redis_store::RedisCacheStore;

use readthrough_config::{CacheBackend, CacheConfig};
use readthrough_core::{ReadThroughError, ReadThroughResult};
use std::sync::Arc;

/// Builds the store selected by the configured address.
pub fn create_store(config: &CacheConfig) -> ReadThroughResult<Arc<dyn CacheStore>> {
    match config.backend() {
        Some(CacheBackend::Redis) => Ok(Arc::new(RedisCacheStore::new(config)?)),
        Some(CacheBackend::Memcached) => Ok(Arc::new(MemcachedCacheStore::new(config))),
        Some(CacheBackend::Memory) => Ok(Arc::new(MemoryCacheStore::new())),
        None => Err(ReadThroughError::Configuration(format!(
            "Unsupported cache address: {}",
            config.address
        ))),
    }
}
