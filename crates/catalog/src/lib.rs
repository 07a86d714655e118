//! Remote catalog gateway.
//!
//! Typed client abstraction over the product service: availability checks,
//! price lookups, stock reservation and release. Every call is a network
//! round-trip to another process and may fail independently; callers wrap
//! these calls in their own resilience policy. The [`FallbackCatalog`] is
//! the degraded substitute used while the product service's circuit is
//! open.

pub mod error;
pub mod fallback;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod product;

pub use error::{CatalogError, Result};
pub use fallback::FallbackCatalog;
pub use gateway::CatalogGateway;
pub use http::HttpCatalogGateway;
pub use memory::InMemoryCatalog;
pub use product::Product;
