use common::ProductId;
use thiserror::Error;

/// Errors from the remote catalog gateway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The product ID is unknown to the catalog.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// Transport failure or 5xx from the product service.
    ///
    /// Transient; retried per the caller's resilience policy and counted
    /// against the circuit breaker.
    #[error("product service unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Returns true if this error is transient and worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, CatalogError::Unavailable(_))
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
