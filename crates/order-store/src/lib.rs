//! Order persistence.
//!
//! Pure storage contract for Order aggregates: identity assignment on
//! first save, optimistic version bumps on every save, and paginated
//! lookups. No business logic lives here; all validation happens before
//! this layer is invoked.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use error::{Result, StoreError};
pub use memory::InMemoryOrderRepository;
pub use postgres::PostgresOrderRepository;
pub use repository::OrderRepository;
