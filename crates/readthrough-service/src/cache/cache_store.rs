//! Cache store traits for scoped, connection-oriented access.

use async_trait::async_trait;
use readthrough_core::{codec, FetchResult, ReadThroughResult};
use tracing::warn;

/// A key-value store reached over a network client.
///
/// Every invocation acquires its own connection, so implementations never
/// need to share mutable state between callers.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Acquires a connection.
    ///
    /// Fails with `CacheUnavailable` if the store cannot be reached.
    async fn connect(&self) -> ReadThroughResult<Box<dyn CacheConnection>>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// A connection acquired from a [`CacheStore`].
///
/// `close` consumes the connection, so it runs at most once. A connection
/// dropped without `close` (for example when the owning future is
/// cancelled) is still released by its destructor.
#[async_trait]
pub trait CacheConnection: Send {
    /// Reads a value. A missing key is `Ok(None)`, never an error.
    async fn get(&mut self, key: &str) -> ReadThroughResult<Option<Vec<u8>>>;

    /// Writes a value, replacing any previous one.
    async fn set(&mut self, key: &str, value: &[u8]) -> ReadThroughResult<()>;

    /// Releases the connection.
    async fn close(self: Box<Self>) -> ReadThroughResult<()>;
}

/// Typed document access on top of raw bytes.
#[async_trait]
pub trait CacheConnectionExt: CacheConnection {
    /// Reads and decodes a document.
    ///
    /// Bytes that do not decode are a `Deserialization` error, not a miss.
    async fn get_document<D: FetchResult>(&mut self, key: &str) -> ReadThroughResult<Option<D>> {
        match self.get(key).await? {
            Some(bytes) => Ok(Some(codec::decode(key, &bytes)?)),
            None => Ok(None),
        }
    }

    /// Encodes and writes a document.
    async fn set_document<D: FetchResult>(&mut self, key: &str, document: &D) -> ReadThroughResult<()> {
        let bytes = codec::encode(document)?;
        self.set(key, &bytes).await
    }
}

impl<T: CacheConnection + ?Sized> CacheConnectionExt for T {}

/// Closes a connection. A failed close is logged, not returned.
pub async fn release(connection: Box<dyn CacheConnection>) {
    if let Err(e) = connection.close().await {
        warn!(error = %e, "Failed to close cache connection");
    }
}
