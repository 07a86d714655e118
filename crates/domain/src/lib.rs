//! Domain layer for the order system.
//!
//! This crate provides the Order aggregate root with its owned line items
//! and the lifecycle state machine governing status transitions. All status
//! changes go through the transition methods here; nothing outside this
//! crate writes a status directly.

pub mod error;
pub mod order;
pub mod status;

pub use common::{CustomerId, Money, OrderId, ProductId, Version};
pub use error::OrderError;
pub use order::{Order, OrderItem};
pub use status::OrderStatus;
