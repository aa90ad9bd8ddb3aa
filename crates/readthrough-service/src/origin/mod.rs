//! Origin data sources consulted on a cache miss.

mod http_origin;
mod origin_source;

pub use http_origin::HttpOriginSource;
pub use origin_source::OriginSource;

#[cfg(test)]
pub use origin_source::MockOriginSource;
