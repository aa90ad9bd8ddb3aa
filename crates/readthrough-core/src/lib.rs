//! # Readthrough Core
//!
//! Core types, traits, and error definitions for the read-through cache.
//! Everything that crosses the cache boundary is defined here: the error
//! taxonomy, the document trait, the JSON codec, and the concrete
//! employee document.

pub mod codec;
pub mod domain;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use result::*;
pub use traits::*;
pub use validation::*;
