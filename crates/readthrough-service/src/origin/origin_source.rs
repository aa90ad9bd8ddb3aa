//! Origin source trait.

use async_trait::async_trait;
use readthrough_core::{FetchResult, ReadThroughResult};

/// The authoritative, slower data source behind the cache.
#[cfg_attr(test, mockall::automock(type Document = readthrough_core::EmployeeList;))]
#[async_trait]
pub trait OriginSource: Send + Sync {
    /// The document this origin serves.
    type Document: FetchResult;

    /// Fetches the current document.
    ///
    /// Fails with `OriginUnavailable` when the origin cannot be reached or
    /// answers with a non-success status, and with `OriginFormat` when the
    /// body is not a valid document.
    async fn fetch(&self) -> ReadThroughResult<Self::Document>;
}
