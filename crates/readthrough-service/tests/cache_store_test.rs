//! Networked cache stores against real servers in containers.
//!
//! Needs a Docker daemon: `cargo test -p readthrough-service -- --ignored`.

mod common;

use common::{http_origin, json_response, mock_origin, start_memcached, start_redis, TIGER_JSON};
use deadpool_redis::redis;
use readthrough_config::CacheConfig;
use readthrough_core::{EmployeeList, EMPLOYEES_KEY};
use readthrough_service::{
    CacheConnection, CacheStore, MemcachedCacheStore, ReadThroughFetcher, RedisCacheStore,
};
use std::sync::Arc;

fn cache_config(address: &str, ttl_secs: Option<u64>) -> CacheConfig {
    CacheConfig {
        address: address.to_string(),
        connect_timeout_ms: 5_000,
        ttl_secs,
        ..CacheConfig::default()
    }
}

/// Absent keys read as `None`; a written key reads back byte for byte.
async fn assert_get_set(store: &dyn CacheStore) {
    let mut conn: Box<dyn CacheConnection> = store.connect().await.unwrap();

    assert_eq!(conn.get("absent").await.unwrap(), None);

    conn.set("present", TIGER_JSON.as_bytes()).await.unwrap();
    assert_eq!(conn.get("present").await.unwrap(), Some(TIGER_JSON.as_bytes().to_vec()));
    assert_eq!(conn.get("absent").await.unwrap(), None);

    conn.close().await.unwrap();

    let mut conn = store.connect().await.unwrap();
    assert_eq!(conn.get("present").await.unwrap(), Some(TIGER_JSON.as_bytes().to_vec()));
    conn.close().await.unwrap();
}

async fn redis_ttl(address: &str, key: &str) -> i64 {
    let client = redis::Client::open(address).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    redis::cmd("TTL").arg(key).query_async(&mut conn).await.unwrap()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_redis_get_and_set() {
    let (_container, address) = start_redis().await;
    let store = RedisCacheStore::new(&cache_config(&address, None)).unwrap();

    assert_get_set(&store).await;

    // No ttl configured: the key never expires.
    assert_eq!(redis_ttl(&address, "present").await, -1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_redis_write_back_applies_ttl() {
    let (_container, address) = start_redis().await;
    let server = mock_origin(json_response(TIGER_JSON), 1).await;

    let store: Arc<dyn CacheStore> = Arc::new(RedisCacheStore::new(&cache_config(&address, Some(120))).unwrap());
    let fetcher: ReadThroughFetcher<EmployeeList> = ReadThroughFetcher::new(store, Arc::new(http_origin(&server)));

    let first = fetcher.fetch(EMPLOYEES_KEY).await.unwrap();
    let second = fetcher.fetch(EMPLOYEES_KEY).await.unwrap();
    assert_eq!(first, second);

    let ttl = redis_ttl(&address, EMPLOYEES_KEY).await;
    assert!(ttl > 0 && ttl <= 120, "ttl was {ttl}");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_memcached_get_and_set() {
    let (_container, address) = start_memcached().await;
    let store = MemcachedCacheStore::new(&cache_config(&address, Some(60)));

    assert_get_set(&store).await;
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_memcached_read_through_from_legacy_address() {
    let (_container, address) = start_memcached().await;
    let server = mock_origin(json_response(TIGER_JSON), 1).await;

    // `memcachedUrl` carries a bare host:port.
    let bare = address.trim_start_matches("memcache://");
    let fetcher =
        ReadThroughFetcher::<EmployeeList>::from_config(&cache_config(bare, None), &common::origin_config(&server))
            .unwrap();

    let first = fetcher.fetch(EMPLOYEES_KEY).await.unwrap();
    let second = fetcher.fetch(EMPLOYEES_KEY).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.employees()[0].name, "Tiger");
}
