//! Result type aliases.

use crate::ReadThroughError;

/// A specialized `Result` type for read-through operations.
pub type ReadThroughResult<T> = Result<T, ReadThroughError>;
