//! JSON codec for values crossing the cache boundary.
//!
//! Cached values are UTF-8 encoded JSON text stored as opaque bytes.

use crate::{FetchResult, ReadThroughError, ReadThroughResult};

/// Encodes a document into the cache wire format.
///
/// The document is validated first, so anything written can be decoded.
pub fn encode<T: FetchResult>(document: &T) -> ReadThroughResult<Vec<u8>> {
    document
        .validate_document()
        .map_err(ReadThroughError::Serialization)?;

    serde_json::to_vec(document).map_err(|e| ReadThroughError::Serialization(e.to_string()))
}

/// Decodes and validates a cached value read from `key`.
///
/// Malformed bytes are always an error, never a miss.
pub fn decode<T: FetchResult>(key: &str, bytes: &[u8]) -> ReadThroughResult<T> {
    let document: T =
        serde_json::from_slice(bytes).map_err(|e| ReadThroughError::deserialization(key, e))?;

    document
        .validate_document()
        .map_err(|reason| ReadThroughError::deserialization(key, reason))?;

    Ok(document)
}
