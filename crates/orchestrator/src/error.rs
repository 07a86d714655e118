use catalog::CatalogError;
use common::{OrderId, ProductId};
use domain::OrderError;
use order_store::StoreError;
use thiserror::Error;

/// Errors surfaced by orchestrator operations.
///
/// Transient catalog failures are absorbed by the fallback paths and never
/// appear here for creation/cancellation; what does appear is what the
/// caller must act on.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Referenced order does not exist.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// A requested item failed the availability check; no order was created.
    #[error("product {0} is not available")]
    ProductNotAvailable(ProductId),

    /// Domain validation or state machine rejection.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Persistence failure, including stale-version conflicts.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Catalog failure that could not be absorbed by a fallback path.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
