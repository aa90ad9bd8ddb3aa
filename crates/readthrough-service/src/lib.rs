//! # Readthrough Service
//!
//! The cache-aside core and its collaborators: cache stores, the HTTP
//! origin, the read-through fetcher, and the invocation handlers built on
//! top of it.

pub mod cache;
pub mod fetcher;
pub mod handler;
pub mod origin;

pub use cache::*;
pub use fetcher::*;
pub use handler::*;
pub use origin::*;
