use std::collections::HashMap;
use std::sync::Arc;

use common::{CustomerId, OrderId, Page, PageRequest};
use domain::Order;
use tokio::sync::RwLock;

/// Read-path cache for single-order and per-customer paginated lookups.
///
/// Mutations invalidate the whole cache: by-customer pages cannot be
/// targeted precisely once an order changes, so nothing is kept.
#[derive(Debug, Clone, Default)]
pub struct OrderCache {
    inner: Arc<RwLock<CacheInner>>,
}

#[derive(Debug, Default)]
struct CacheInner {
    orders: HashMap<OrderId, Order>,
    customer_pages: HashMap<(CustomerId, usize, usize), Page<Order>>,
}

impl OrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_order(&self, id: OrderId) -> Option<Order> {
        let hit = self.inner.read().await.orders.get(&id).cloned();
        match hit {
            Some(order) => {
                metrics::counter!("order_cache_hits_total").increment(1);
                Some(order)
            }
            None => {
                metrics::counter!("order_cache_misses_total").increment(1);
                None
            }
        }
    }

    pub async fn put_order(&self, order: &Order) {
        if let Some(id) = order.id() {
            self.inner.write().await.orders.insert(id, order.clone());
        }
    }

    pub async fn get_customer_page(
        &self,
        customer_id: &CustomerId,
        page: PageRequest,
    ) -> Option<Page<Order>> {
        let key = (customer_id.clone(), page.page, page.size);
        let hit = self.inner.read().await.customer_pages.get(&key).cloned();
        match hit {
            Some(cached) => {
                metrics::counter!("order_cache_hits_total").increment(1);
                Some(cached)
            }
            None => {
                metrics::counter!("order_cache_misses_total").increment(1);
                None
            }
        }
    }

    pub async fn put_customer_page(
        &self,
        customer_id: &CustomerId,
        page: PageRequest,
        result: &Page<Order>,
    ) {
        let key = (customer_id.clone(), page.page, page.size);
        self.inner
            .write()
            .await
            .customer_pages
            .insert(key, result.clone());
    }

    /// Drops every cached entry.
    pub async fn invalidate_all(&self) {
        let mut inner = self.inner.write().await;
        inner.orders.clear();
        inner.customer_pages.clear();
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.orders.len() + inner.customer_pages.len()
    }
}
