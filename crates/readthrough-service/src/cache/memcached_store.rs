//! Memcached-based cache store.

use super::{CacheConnection, CacheStore};
use async_trait::async_trait;
use memcache::{Client, MemcacheError};
use readthrough_config::CacheConfig;
use readthrough_core::{ReadThroughError, ReadThroughResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, info};

/// Longest relative expiry memcached accepts; larger values are read as
/// unix timestamps.
const MAX_RELATIVE_EXPIRY_SECS: u64 = 30 * 24 * 60 * 60;

/// Memcached store speaking the text protocol through the `memcache` client.
///
/// The client is blocking, so every command runs on the blocking pool and
/// is bounded by the configured operation timeout.
pub struct MemcachedCacheStore {
    url: String,
    connect_timeout: Duration,
    operation_timeout: Duration,
    /// Expiry passed with every SET; 0 means never.
    expiration: u32,
}

impl MemcachedCacheStore {
    /// Creates a store from configuration. Nothing is connected yet.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let url = config.normalized_address();
        info!("Using memcached cache store at {}", url);

        let expiration = config
            .ttl_secs
            .map_or(0, |secs| secs.clamp(1, MAX_RELATIVE_EXPIRY_SECS));

        Self {
            url,
            connect_timeout: config.connect_timeout(),
            operation_timeout: config.operation_timeout(),
            expiration: u32::try_from(expiration).unwrap_or(u32::MAX),
        }
    }
}

#[async_trait]
impl CacheStore for MemcachedCacheStore {
    async fn connect(&self) -> ReadThroughResult<Box<dyn CacheConnection>> {
        let url = self.url.clone();
        let (tx, rx) = oneshot::channel();

        // Connecting blocks until the client's pool gives up, which can
        // outlast `connect_timeout`; an abandoned attempt runs out detached.
        std::thread::spawn(move || {
            let _ = tx.send(Client::connect(url.as_str()));
        });

        let client = timeout(self.connect_timeout, rx)
            .await
            .map_err(|_| {
                ReadThroughError::cache_unavailable(format!(
                    "Connecting to {} timed out after {:?}",
                    self.url, self.connect_timeout
                ))
            })?
            .map_err(|_| ReadThroughError::internal("memcached connect thread exited"))?
            .map_err(|e| unavailable("connect", &self.url, &e))?;

        client
            .set_read_timeout(Some(self.operation_timeout))
            .and_then(|()| client.set_write_timeout(Some(self.operation_timeout)))
            .map_err(|e| unavailable("configure", &self.url, &e))?;

        debug!("Connected to memcached at {}", self.url);

        Ok(Box::new(MemcachedCacheConnection {
            client: Arc::new(client),
            operation_timeout: self.operation_timeout,
            expiration: self.expiration,
        }))
    }

    fn name(&self) -> &'static str {
        "memcached"
    }
}

fn unavailable(action: &str, target: &str, err: &MemcacheError) -> ReadThroughError {
    ReadThroughError::cache_unavailable(format!("memcached {} '{}' failed: {}", action, target, err))
}

struct MemcachedCacheConnection {
    client: Arc<Client>,
    operation_timeout: Duration,
    expiration: u32,
}

impl MemcachedCacheConnection {
    /// Runs a blocking client call under the operation timeout.
    async fn run<T, F>(&self, action: &str, key: &str, call: F) -> ReadThroughResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Client) -> Result<T, MemcacheError> + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let task = tokio::task::spawn_blocking(move || call(&client));

        timeout(self.operation_timeout, task)
            .await
            .map_err(|_| {
                ReadThroughError::cache_unavailable(format!(
                    "{} '{}' timed out after {:?}",
                    action, key, self.operation_timeout
                ))
            })?
            .map_err(|e| ReadThroughError::internal(format!("{} '{}' task failed: {}", action, key, e)))?
            .map_err(|e| unavailable(action, key, &e))
    }
}

#[async_trait]
impl CacheConnection for MemcachedCacheConnection {
    async fn get(&mut self, key: &str) -> ReadThroughResult<Option<Vec<u8>>> {
        let owned_key = key.to_string();
        let value = self
            .run("GET", key, move |client| client.get::<Vec<u8>>(&owned_key))
            .await?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&mut self, key: &str, value: &[u8]) -> ReadThroughResult<()> {
        let owned_key = key.to_string();
        let bytes = value.to_vec();
        let expiration = self.expiration;

        self.run("SET", key, move |client| {
            client.set(&owned_key, bytes.as_slice(), expiration)
        })
        .await?;

        debug!("Cached key '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    async fn close(self: Box<Self>) -> ReadThroughResult<()> {
        drop(self);
        debug!("Closed memcached connection");
        Ok(())
    }
}
