use async_trait::async_trait;
use common::{CustomerId, OrderId, Page, PageRequest};
use domain::{Order, OrderStatus};

use crate::Result;

/// Persistence contract for Order aggregates.
///
/// All implementations must be thread-safe (Send + Sync). Saves are
/// atomic per aggregate and enforce optimistic concurrency: a save whose
/// version does not match the stored version fails with
/// `StoreError::VersionConflict` instead of silently overwriting.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists an order and returns it with storage-assigned fields.
    ///
    /// On first save the repository assigns the identity, bumps the
    /// version to 1, and refreshes `updated_at`. Every subsequent save
    /// bumps the version again; a stale version is rejected.
    async fn save(&self, order: Order) -> Result<Order>;

    /// Looks up a single order by identity.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    /// Returns one page of all orders, oldest first.
    async fn find_all(&self, page: PageRequest) -> Result<Page<Order>>;

    /// Returns one page of a customer's orders, oldest first.
    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
        page: PageRequest,
    ) -> Result<Page<Order>>;

    /// Returns one page of orders in the given status, oldest first.
    async fn find_by_status(&self, status: OrderStatus, page: PageRequest)
    -> Result<Page<Order>>;

    /// Total number of orders.
    async fn count(&self) -> Result<u64>;

    /// Number of orders in the given status.
    async fn count_by_status(&self, status: OrderStatus) -> Result<u64>;
}
