//! Core traits shared by the cache, origin, and fetcher layers.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A structured document that can be fetched from an origin and stored in
/// the cache.
///
/// Implementors must round-trip losslessly through their JSON form:
/// decoding the encoded bytes of a value yields an equal value.
pub trait FetchResult: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Checks invariants that the serde schema alone cannot express.
    ///
    /// Returns a human-readable reason on failure.
    fn validate_document(&self) -> Result<(), String> {
        Ok(())
    }
}
