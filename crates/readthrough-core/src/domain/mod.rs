//! Documents served through the read-through cache.

mod employee;

pub use employee::*;
