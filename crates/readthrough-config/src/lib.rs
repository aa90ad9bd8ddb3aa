//! # Readthrough Config
//!
//! Configuration management for the read-through cache.
//! Configuration is resolved once at startup from files and environment
//! variables, validated, and handed to constructors as plain structs.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
