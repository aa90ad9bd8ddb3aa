//! Configuration validation module.
//!
//! Collects every problem in one pass so a misconfigured deployment
//! reports all of them at startup.

use crate::AppConfig;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String },
    /// Pool size must be between 1 and the maximum.
    InvalidPoolSize { value: usize, maximum: usize },
    /// Store-side expiry must be positive when set.
    ZeroTtl,
    /// Accept header is empty.
    EmptyAcceptHeader,
    /// Log level is invalid.
    InvalidLogLevel { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveTimeout { name } => {
                write!(f, "Timeout '{}' must be positive", name)
            }
            Self::InvalidPoolSize { value, maximum } => {
                write!(
                    f,
                    "Invalid cache pool size: {} (must be between 1 and {})",
                    value, maximum
                )
            }
            Self::ZeroTtl => write!(f, "cache.ttl_secs must be positive when set"),
            Self::EmptyAcceptHeader => write!(f, "origin.accept must not be empty"),
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: usize = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_cache(&config.cache, &mut errors);
        Self::validate_origin(&config.origin, &mut errors);
        Self::validate_logging(&config.logging, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_cache(config: &crate::CacheConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.address.trim().is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "cache".to_string(),
                message: "address cannot be empty".to_string(),
            });
        } else if config.backend().is_none() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "cache".to_string(),
                message: "address must use redis://, rediss://, memcache:// or memory://".to_string(),
            });
        } else if config.backend() != Some(crate::CacheBackend::Memory)
            && Url::parse(&config.normalized_address()).is_err()
        {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "cache".to_string(),
                message: format!("Invalid URL format: {}", config.address),
            });
        }

        if config.pool_size == 0 || config.pool_size > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::InvalidPoolSize {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.operation_timeout_ms == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "cache.operation_timeout_ms".to_string(),
            });
        }
        if config.connect_timeout_ms == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "cache.connect_timeout_ms".to_string(),
            });
        }

        if config.ttl_secs == Some(0) {
            errors.push(ConfigValidationError::ZeroTtl);
        }
    }

    fn validate_origin(config: &crate::OriginConfig, errors: &mut Vec<ConfigValidationError>) {
        match Url::parse(&config.url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "origin".to_string(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "origin".to_string(),
                message: e.to_string(),
            }),
        }

        if config.accept.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyAcceptHeader);
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "origin.connect_timeout_secs".to_string(),
            });
        }
        if config.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "origin.request_timeout_secs".to_string(),
            });
        }
    }

    fn validate_logging(
        config: &readthrough_core::telemetry::LoggingConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        let level = config.level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.level.clone(),
            });
        }
    }
}
