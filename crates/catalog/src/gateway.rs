use async_trait::async_trait;
use common::ProductId;

use crate::Result;
use crate::product::Product;

/// Contract for the remote product catalog.
///
/// Every method is a round-trip to the product service. Failures surface
/// as [`CatalogError::Unavailable`](crate::CatalogError::Unavailable)
/// (transport/5xx) or [`CatalogError::NotFound`](crate::CatalogError::NotFound)
/// (unknown product). Insufficient stock is signaled as a declined boolean
/// from `can_reserve`/`check_availability`, not as an error.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Returns true if the product is active and has stock.
    async fn check_availability(&self, product_id: ProductId) -> Result<bool>;

    /// Fetches the authoritative product record (name, price, stock).
    async fn get_product(&self, product_id: ProductId) -> Result<Product>;

    /// Returns true if the given quantity can currently be reserved.
    async fn can_reserve(&self, product_id: ProductId, quantity: u32) -> Result<bool>;

    /// Decrements remote stock for the product; returns the updated record.
    async fn reserve_stock(&self, product_id: ProductId, quantity: u32) -> Result<Product>;

    /// Increments remote stock back after a cancellation.
    ///
    /// The remote side does not guarantee idempotency; callers must only
    /// release what they actually reserved.
    async fn release_stock(&self, product_id: ProductId, quantity: u32) -> Result<Product>;
}
