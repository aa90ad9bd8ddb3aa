//! Unified error types for the read-through cache.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for every layer of the read-through cache.
///
/// A cache miss is never represented here: stores report absence as
/// `Ok(None)`, so every variant is a genuine failure.
#[derive(Error, Debug)]
pub enum ReadThroughError {
    // ============ Cache Store Errors ============
    /// The cache store could not be reached or rejected the command.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// A cached value could not be parsed as the expected document.
    #[error("Malformed cache entry for key '{key}': {message}")]
    Deserialization { key: String, message: String },

    /// A document could not be encoded for the cache.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ============ Origin Errors ============
    /// The origin could not be reached or answered with a non-success status.
    #[error("Origin unavailable: {url} - {message}")]
    OriginUnavailable { url: String, message: String },

    /// The origin answered, but the body is not the expected document.
    #[error("Origin returned a malformed document: {0}")]
    OriginFormat(String),

    // ============ Infrastructure Errors ============
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReadThroughError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CacheUnavailable(_) => "CACHE_UNAVAILABLE",
            Self::Deserialization { .. } => "DESERIALIZATION_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::OriginUnavailable { .. } => "ORIGIN_UNAVAILABLE",
            Self::OriginFormat(_) => "ORIGIN_FORMAT_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a cache unavailable error.
    #[must_use]
    pub fn cache_unavailable<T: Into<String>>(message: T) -> Self {
        Self::CacheUnavailable(message.into())
    }

    /// Creates an origin unavailable error.
    #[must_use]
    pub fn origin_unavailable<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::OriginUnavailable {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a deserialization error for a cached key.
    #[must_use]
    pub fn deserialization<K: Into<String>, M: ToString>(key: K, message: M) -> Self {
        Self::Deserialization {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is transient.
    ///
    /// Malformed payloads are not: retrying would read the same bytes again.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::CacheUnavailable(_) | Self::OriginUnavailable { .. }
        )
    }

    /// Checks if this error came from the cache store.
    #[must_use]
    pub const fn is_cache_failure(&self) -> bool {
        matches!(self, Self::CacheUnavailable(_))
    }
}

/// Serializable error body printed by the invocation surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Whether invoking again may succeed
    pub retriable: bool,
}

impl From<&ReadThroughError> for ErrorResponse {
    fn from(error: &ReadThroughError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            retriable: error.is_retriable(),
        }
    }
}
