//! Redis-based cache store.

use super::{CacheConnection, CacheStore};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, Runtime};
use readthrough_config::CacheConfig;
use readthrough_core::{ReadThroughError, ReadThroughResult};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Redis-based cache store backed by a connection pool.
///
/// The pool is created lazily: no connection is opened until the first
/// [`CacheStore::connect`].
pub struct RedisCacheStore {
    /// Redis connection pool.
    pool: Pool,
    /// Deadline for a single GET/SET.
    operation_timeout: Duration,
    /// Expiry applied on SET, if any.
    ttl: Option<Duration>,
}

impl RedisCacheStore {
    /// Creates a Redis cache store from configuration.
    pub fn new(config: &CacheConfig) -> ReadThroughResult<Self> {
        let address = config.normalized_address();
        info!("Creating Redis cache pool for {}", address);

        let pool = Config::from_url(address)
            .builder()
            .map_err(|e| ReadThroughError::Configuration(format!("Invalid Redis config: {}", e)))?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(config.connect_timeout()))
            .create_timeout(Some(config.connect_timeout()))
            .build()
            .map_err(|e| ReadThroughError::Configuration(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self {
            pool,
            operation_timeout: config.operation_timeout(),
            ttl: config.ttl(),
        })
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn connect(&self) -> ReadThroughResult<Box<dyn CacheConnection>> {
        let conn = self.pool.get().await.map_err(|e| {
            ReadThroughError::cache_unavailable(format!("Failed to get Redis connection: {}", e))
        })?;

        debug!("Acquired Redis connection");

        Ok(Box::new(RedisCacheConnection {
            conn,
            operation_timeout: self.operation_timeout,
            ttl: self.ttl,
        }))
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// A pooled Redis connection; returned to the pool when dropped.
struct RedisCacheConnection {
    conn: deadpool_redis::Connection,
    operation_timeout: Duration,
    ttl: Option<Duration>,
}

#[async_trait]
impl CacheConnection for RedisCacheConnection {
    async fn get(&mut self, key: &str) -> ReadThroughResult<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> = timeout(self.operation_timeout, self.conn.get(key))
            .await
            .map_err(|_| {
                ReadThroughError::cache_unavailable(format!(
                    "GET '{}' timed out after {:?}",
                    key, self.operation_timeout
                ))
            })?
            .map_err(|e| {
                ReadThroughError::cache_unavailable(format!("Failed to get key '{}': {}", key, e))
            })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&mut self, key: &str, value: &[u8]) -> ReadThroughResult<()> {
        let ttl = self.ttl;
        let conn = &mut self.conn;
        let command = async move {
            match ttl {
                Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await,
                None => conn.set::<_, _, ()>(key, value).await,
            }
        };

        timeout(self.operation_timeout, command)
            .await
            .map_err(|_| {
                ReadThroughError::cache_unavailable(format!(
                    "SET '{}' timed out after {:?}",
                    key, self.operation_timeout
                ))
            })?
            .map_err(|e| {
                ReadThroughError::cache_unavailable(format!("Failed to set key '{}': {}", key, e))
            })?;

        debug!("Cached key '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    async fn close(self: Box<Self>) -> ReadThroughResult<()> {
        drop(self);
        debug!("Released Redis connection");
        Ok(())
    }
}
