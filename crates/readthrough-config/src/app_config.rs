//! Application configuration structures.

use readthrough_core::telemetry::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Scheme of memcached addresses; also assumed for bare `host:port`.
pub const MEMCACHE_SCHEME: &str = "memcache://";

/// Origin URL of the employee directory.
pub const DEFAULT_ORIGIN_URL: &str = "https://dummy.restapiexample.com/api/v1/employees";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Cache store configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Origin configuration.
    #[serde(default)]
    pub origin: OriginConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "readthrough".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// What the handler layer does when the cache store is unreachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheFailurePolicy {
    /// Fail the invocation.
    #[default]
    Fail,
    /// Serve straight from the origin without touching the cache.
    Bypass,
}

impl fmt::Display for CacheFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Bypass => write!(f, "bypass"),
        }
    }
}

/// Which store implementation a cache address selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Networked Redis-protocol store (`redis://`, `rediss://`).
    Redis,
    /// Networked memcached store (`memcache://`).
    Memcached,
    /// Process-local store (`memory://`).
    Memory,
}

/// Cache store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Network address of the cache store.
    pub address: String,
    /// Maximum pooled connections.
    pub pool_size: usize,
    /// Timeout for a single get/set command, in milliseconds.
    pub operation_timeout_ms: u64,
    /// Timeout for acquiring a connection, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Expiry applied by the store on write-back. `None` keeps entries forever.
    pub ttl_secs: Option<u64>,
    /// Handler behaviour when the store is unreachable.
    pub failure_policy: CacheFailurePolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            address: "redis://127.0.0.1:6379".to_string(),
            pool_size: 8,
            operation_timeout_ms: 2_000,
            connect_timeout_ms: 2_000,
            ttl_secs: None,
            failure_policy: CacheFailurePolicy::Fail,
        }
    }
}

impl CacheConfig {
    /// Returns the address with a scheme.
    ///
    /// A bare `host:port`, as historically supplied through `memcachedUrl`,
    /// is read as a memcached address.
    #[must_use]
    pub fn normalized_address(&self) -> String {
        let address = self.address.trim();
        if address.contains("://") {
            address.to_string()
        } else {
            format!("{}{}", MEMCACHE_SCHEME, address)
        }
    }

    /// Returns the backend selected by the address scheme.
    #[must_use]
    pub fn backend(&self) -> Option<CacheBackend> {
        let address = self.normalized_address();
        if address.starts_with("redis://") || address.starts_with("rediss://") {
            Some(CacheBackend::Redis)
        } else if address.starts_with(MEMCACHE_SCHEME) {
            Some(CacheBackend::Memcached)
        } else if address.starts_with("memory://") {
            Some(CacheBackend::Memory)
        } else {
            None
        }
    }

    /// Returns the command timeout as a Duration.
    #[must_use]
    pub const fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Returns the connection acquisition timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the store-side expiry, if any.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

/// Origin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Fixed endpoint fetched on a cache miss.
    pub url: String,
    /// Value of the `Accept` request header.
    pub accept: String,
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ORIGIN_URL.to_string(),
            accept: "application/json".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 15,
        }
    }
}

impl OriginConfig {
    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.app.name, "readthrough");
        assert_eq!(config.cache.address, "redis://127.0.0.1:6379");
        assert_eq!(config.cache.failure_policy, CacheFailurePolicy::Fail);
        assert_eq!(config.origin.url, DEFAULT_ORIGIN_URL);
        assert_eq!(config.origin.accept, "application/json");
    }

    #[test]
    fn test_normalized_address() {
        let mut cache = CacheConfig {
            address: "cache.internal:11211".to_string(),
            ..CacheConfig::default()
        };
        assert_eq!(cache.normalized_address(), "memcache://cache.internal:11211");

        cache.address = " rediss://secure:6380 ".to_string();
        assert_eq!(cache.normalized_address(), "rediss://secure:6380");
    }

    #[test]
    fn test_backend_selection() {
        let mut cache = CacheConfig::default();
        assert_eq!(cache.backend(), Some(CacheBackend::Redis));

        cache.address = "memory://".to_string();
        assert_eq!(cache.backend(), Some(CacheBackend::Memory));

        cache.address = "memcache://10.0.0.5:11211".to_string();
        assert_eq!(cache.backend(), Some(CacheBackend::Memcached));

        cache.address = "10.0.0.5:11211".to_string();
        assert_eq!(cache.backend(), Some(CacheBackend::Memcached));

        cache.address = "http://nope".to_string();
        assert_eq!(cache.backend(), None);
    }

    #[test]
    fn test_durations() {
        let cache = CacheConfig {
            ttl_secs: Some(60),
            ..CacheConfig::default()
        };
        assert_eq!(cache.operation_timeout(), Duration::from_secs(2));
        assert_eq!(cache.connect_timeout(), Duration::from_secs(2));
        assert_eq!(cache.ttl(), Some(Duration::from_secs(60)));
        assert_eq!(CacheConfig::default().ttl(), None);

        let origin = OriginConfig::default();
        assert_eq!(origin.connect_timeout(), Duration::from_secs(5));
        assert_eq!(origin.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_failure_policy_serde() {
        let policy: CacheFailurePolicy = serde_json::from_str(r#""bypass""#).unwrap();
        assert_eq!(policy, CacheFailurePolicy::Bypass);
        assert_eq!(policy.to_string(), "bypass");
    }
}
