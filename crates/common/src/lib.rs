//! Shared types for the order orchestration system.

pub mod page;
pub mod types;

pub use page::{Page, PageRequest};
pub use types::{CustomerId, InvalidCustomerId, Money, OrderId, ProductId, Version};
