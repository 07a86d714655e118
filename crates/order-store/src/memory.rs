use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{CustomerId, OrderId, Page, PageRequest};
use domain::{Order, OrderStatus};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::repository::OrderRepository;

/// In-memory order repository for tests and local development.
///
/// Provides the same optimistic-versioning semantics as the PostgreSQL
/// implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all stored orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }

    fn paginate(mut matching: Vec<Order>, page: PageRequest) -> Page<Order> {
        matching.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().map(|i| i.as_uuid()).cmp(&b.id().map(|i| i.as_uuid())))
        });
        let total = matching.len();
        let content = matching
            .into_iter()
            .skip(page.offset())
            .take(page.size)
            .collect();
        Page::new(content, page, total)
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, mut order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let now = Utc::now();

        match order.id() {
            None => {
                let id = OrderId::new();
                order.mark_persisted(id, order.version().next(), now);
                orders.insert(id, order.clone());
                Ok(order)
            }
            Some(id) => {
                let stored = orders.get(&id).ok_or(StoreError::NotFound(id))?;
                if stored.version() != order.version() {
                    return Err(StoreError::VersionConflict {
                        order_id: id,
                        expected: order.version(),
                        actual: stored.version(),
                    });
                }
                order.mark_persisted(id, order.version().next(), now);
                orders.insert(id, order.clone());
                Ok(order)
            }
        }
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Order>> {
        let orders = self.orders.read().await;
        Ok(Self::paginate(orders.values().cloned().collect(), page))
    }

    async fn find_by_customer(
        &self,
        customer_id: &CustomerId,
        page: PageRequest,
    ) -> Result<Page<Order>> {
        let orders = self.orders.read().await;
        let matching = orders
            .values()
            .filter(|o| o.customer_id() == customer_id)
            .cloned()
            .collect();
        Ok(Self::paginate(matching, page))
    }

    async fn find_by_status(
        &self,
        status: OrderStatus,
        page: PageRequest,
    ) -> Result<Page<Order>> {
        let orders = self.orders.read().await;
        let matching = orders
            .values()
            .filter(|o| o.status() == status)
            .cloned()
            .collect();
        Ok(Self::paginate(matching, page))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.orders.read().await.len() as u64)
    }

    async fn count_by_status(&self, status: OrderStatus) -> Result<u64> {
        let orders = self.orders.read().await;
        Ok(orders.values().filter(|o| o.status() == status).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Money, ProductId, Version};
    use domain::OrderItem;

    fn order_for(customer: &str) -> Order {
        let items = vec![
            OrderItem::new(ProductId::new(1), "Widget", 2, Money::from_cents(1000), None)
                .unwrap(),
        ];
        Order::new(CustomerId::new(customer).unwrap(), items, None).unwrap()
    }

    #[tokio::test]
    async fn first_save_assigns_id_and_version() {
        let repo = InMemoryOrderRepository::new();
        let saved = repo.save(order_for("C1")).await.unwrap();

        assert!(saved.id().is_some());
        assert_eq!(saved.version(), Version::new(1));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn save_bumps_version_each_time() {
        let repo = InMemoryOrderRepository::new();
        let saved = repo.save(order_for("C1")).await.unwrap();
        let again = repo.save(saved).await.unwrap();
        assert_eq!(again.version(), Version::new(2));
    }

    #[tokio::test]
    async fn stale_version_save_is_rejected() {
        let repo = InMemoryOrderRepository::new();
        let saved = repo.save(order_for("C1")).await.unwrap();

        // Two readers load the same version; the second save is stale.
        let copy_a = repo.find_by_id(saved.id().unwrap()).await.unwrap().unwrap();
        let copy_b = repo.find_by_id(saved.id().unwrap()).await.unwrap().unwrap();

        repo.save(copy_a).await.unwrap();
        let result = repo.save(copy_b).await;
        assert!(matches!(result, Err(StoreError::VersionConflict { .. })));
    }

    #[tokio::test]
    async fn find_by_id_missing_returns_none() {
        let repo = InMemoryOrderRepository::new();
        let found = repo.find_by_id(OrderId::new()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_by_customer_filters() {
        let repo = InMemoryOrderRepository::new();
        repo.save(order_for("C1")).await.unwrap();
        repo.save(order_for("C1")).await.unwrap();
        repo.save(order_for("C2")).await.unwrap();

        let c1 = CustomerId::new("C1").unwrap();
        let page = repo
            .find_by_customer(&c1, PageRequest::new(0, 10))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 2);
        assert!(page.content.iter().all(|o| o.customer_id() == &c1));
    }

    #[tokio::test]
    async fn find_by_status_filters() {
        let repo = InMemoryOrderRepository::new();
        let saved = repo.save(order_for("C1")).await.unwrap();
        repo.save(order_for("C2")).await.unwrap();

        let mut cancelled = saved;
        cancelled.cancel("test").unwrap();
        repo.save(cancelled).await.unwrap();

        let pending = repo
            .find_by_status(OrderStatus::Pending, PageRequest::new(0, 10))
            .await
            .unwrap();
        assert_eq!(pending.total_elements, 1);

        let cancelled = repo
            .find_by_status(OrderStatus::Cancelled, PageRequest::new(0, 10))
            .await
            .unwrap();
        assert_eq!(cancelled.total_elements, 1);
    }

    #[tokio::test]
    async fn pagination_slices_and_counts() {
        let repo = InMemoryOrderRepository::new();
        for _ in 0..5 {
            repo.save(order_for("C1")).await.unwrap();
        }

        let page = repo.find_all(PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages(), 3);

        let last = repo.find_all(PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(last.content.len(), 1);
    }

    #[tokio::test]
    async fn count_by_status() {
        let repo = InMemoryOrderRepository::new();
        repo.save(order_for("C1")).await.unwrap();
        repo.save(order_for("C2")).await.unwrap();
        assert_eq!(
            repo.count_by_status(OrderStatus::Pending).await.unwrap(),
            2
        );
        assert_eq!(
            repo.count_by_status(OrderStatus::Delivered).await.unwrap(),
            0
        );
    }
}
