//! Read-through (cache-aside) fetcher.

use crate::cache::{create_store, release, CacheConnection, CacheConnectionExt, CacheStore};
use crate::origin::{HttpOriginSource, OriginSource};
use readthrough_config::{CacheConfig, OriginConfig};
use readthrough_core::{FetchResult, ReadThroughResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Serves a document from the cache, falling back to the origin on a miss
/// and writing the origin's answer back.
pub struct ReadThroughFetcher<D> {
    store: Arc<dyn CacheStore>,
    origin: Arc<dyn OriginSource<Document = D>>,
}

impl<D: FetchResult> ReadThroughFetcher<D> {
    /// Creates a fetcher over an existing store and origin.
    pub fn new(store: Arc<dyn CacheStore>, origin: Arc<dyn OriginSource<Document = D>>) -> Self {
        Self { store, origin }
    }

    /// Creates a fetcher from resolved configuration.
    ///
    /// Nothing is connected yet; the first [`fetch`](Self::fetch) opens the
    /// first cache connection.
    pub fn from_config(cache: &CacheConfig, origin: &OriginConfig) -> ReadThroughResult<Self> {
        let store = create_store(cache)?;
        let origin = HttpOriginSource::<D>::new(origin)?;

        info!(
            "Read-through fetcher using {} cache store and origin {}",
            store.name(),
            origin.url()
        );
        Ok(Self::new(store, Arc::new(origin)))
    }

    /// Returns the document stored under `key`, consulting the origin on a
    /// miss.
    ///
    /// The cache connection is closed exactly once whether this succeeds or
    /// fails. Dropping the returned future releases it without `close`.
    pub async fn fetch(&self, key: &str) -> ReadThroughResult<D> {
        let mut conn = self.store.connect().await?;
        let outcome = self.read_through(conn.as_mut(), key).await;
        release(conn).await;
        outcome
    }

    /// Fetches straight from the origin, leaving the cache untouched.
    pub async fn fetch_uncached(&self) -> ReadThroughResult<D> {
        self.origin.fetch().await
    }

    async fn read_through(&self, conn: &mut dyn CacheConnection, key: &str) -> ReadThroughResult<D> {
        if let Some(document) = conn.get_document::<D>(key).await? {
            debug!("Serving '{}' from cache", key);
            return Ok(document);
        }

        debug!("Fetching '{}' from origin", key);
        let document = self.origin.fetch().await?;

        match conn.set_document(key, &document).await {
            Ok(()) => debug!("Wrote '{}' back to cache", key),
            Err(e) => warn!(
                key = %key,
                error = %e,
                "Cache write-back failed; the next request will fetch from origin again"
            ),
        }

        Ok(document)
    }
}
