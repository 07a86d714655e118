//! Domain error types.

use common::InvalidCustomerId;
use thiserror::Error;

use crate::status::OrderStatus;

/// Errors raised by the Order aggregate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The requested transition is not legal from the current status.
    #[error("cannot {action} an order in status {from}")]
    InvalidStateTransition {
        from: OrderStatus,
        action: &'static str,
    },

    /// Item quantity outside the accepted 1..=1000 range.
    #[error("invalid quantity {quantity}: must be between 1 and 1000")]
    InvalidQuantity { quantity: u32 },

    /// Item unit price must be positive and within the order cap.
    #[error("invalid unit price {price_cents} cents: must be between 1 and 99999999")]
    InvalidPrice { price_cents: i64 },

    /// An order needs at least one line item.
    #[error("order has no items")]
    NoItems,

    /// Order total exceeds the supported maximum.
    #[error("order total {total_cents} cents exceeds the maximum of 99999999")]
    TotalTooLarge { total_cents: i64 },

    /// Notes fields are bounded at 500 characters.
    #[error("notes exceed 500 characters (got {0})")]
    NotesTooLong(usize),

    /// Customer ID failed validation.
    #[error(transparent)]
    CustomerId(#[from] InvalidCustomerId),
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, OrderError>;
