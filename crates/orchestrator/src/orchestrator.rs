//! Order orchestration over the remote catalog and the order repository.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use catalog::{CatalogError, CatalogGateway, FallbackCatalog};
use common::{CustomerId, OrderId, Page, PageRequest, ProductId};
use domain::{Order, OrderError, OrderItem, OrderStatus};
use order_store::OrderRepository;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::breaker::CircuitBreaker;
use crate::cache::OrderCache;
use crate::error::{OrchestratorError, Result};
use crate::events::{NotificationSink, OrderNotification};
use crate::policy::ResilienceConfig;
use crate::statistics::OrderStatistics;

/// One requested line item in a creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub notes: Option<String>,
}

/// An order creation request, validated identifiers included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub items: Vec<CreateOrderItem>,
    pub notes: Option<String>,
}

/// Drives order creation, cancellation, and local lifecycle transitions.
///
/// Every remote catalog call goes through the shared circuit breaker with
/// bounded retries and a per-call timeout, and each operation's remote
/// phase is bounded as a whole by `overall_timeout`. When the catalog
/// cannot be reached in time, creation degrades to an unpriced pending
/// order and cancellation defers to `PendingCancellation`; neither
/// surfaces the outage to the caller.
pub struct OrderOrchestrator<R, C, N> {
    repository: Arc<R>,
    catalog: Arc<C>,
    fallback: FallbackCatalog,
    breaker: CircuitBreaker,
    sink: Arc<N>,
    cache: OrderCache,
    config: ResilienceConfig,
}

impl<R, C, N> Clone for OrderOrchestrator<R, C, N> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            catalog: Arc::clone(&self.catalog),
            fallback: self.fallback,
            breaker: self.breaker.clone(),
            sink: Arc::clone(&self.sink),
            cache: self.cache.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, C, N> OrderOrchestrator<R, C, N>
where
    R: OrderRepository,
    C: CatalogGateway,
    N: NotificationSink,
{
    pub fn new(repository: R, catalog: C, sink: N, config: ResilienceConfig) -> Self {
        let breaker = CircuitBreaker::new(&config);
        Self {
            repository: Arc::new(repository),
            catalog: Arc::new(catalog),
            fallback: FallbackCatalog::new(),
            breaker,
            sink: Arc::new(sink),
            cache: OrderCache::new(),
            config,
        }
    }

    /// The shared circuit breaker guarding catalog calls.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    // -- Creation --

    /// Creates an order for the customer.
    ///
    /// Availability is checked for every item before anything is persisted;
    /// any unavailable item rejects the whole request. Pricing comes from a
    /// single authoritative product fetch per item. If the catalog is
    /// unreachable past the resilience limits, a degraded unpriced order is
    /// persisted instead of failing the request.
    #[tracing::instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order> {
        let start = Instant::now();
        if request.items.is_empty() {
            return Err(OrderError::NoItems.into());
        }

        let priced = tokio::time::timeout(
            self.config.overall_timeout,
            self.priced_order(&request),
        )
        .await;
        let order = match priced {
            Ok(Ok(order)) => order,
            Ok(Err(OrchestratorError::Catalog(err))) if err.is_transient() => {
                return self.create_order_fallback(&request, &err, start).await;
            }
            Ok(Err(other)) => return Err(other),
            Err(_) => {
                let cause = CatalogError::Unavailable("pricing pass timed out".to_string());
                return self.create_order_fallback(&request, &cause, start).await;
            }
        };

        let order = self.repository.save(order).await?;
        self.cache.invalidate_all().await;
        let order_id = persisted_id(&order);

        // Reservations happen only after the row exists; a failure here
        // leaves a pending order with no reservation, reconciled out of
        // band rather than rolled back.
        let reserved = tokio::time::timeout(self.config.overall_timeout, async {
            for item in order.items() {
                let product_id = item.product_id;
                let quantity = item.quantity;
                if let Err(err) = self
                    .guarded("reserve_stock", || {
                        self.catalog.reserve_stock(product_id, quantity)
                    })
                    .await
                {
                    tracing::error!(
                        %order_id,
                        %product_id,
                        quantity,
                        error = %err,
                        "stock reservation failed after persist"
                    );
                }
            }
        })
        .await;
        if reserved.is_err() {
            tracing::error!(%order_id, "stock reservation phase timed out");
        }

        metrics::counter!("orders_created_total").increment(1);
        metrics::histogram!("order_creation_seconds").record(start.elapsed().as_secs_f64());
        self.sink
            .publish(OrderNotification::Created {
                order_id,
                customer_id: order.customer_id().clone(),
                total_cents: order.total_amount().cents(),
            })
            .await;
        tracing::info!(%order_id, total = %order.total_amount(), "order created");
        Ok(order)
    }

    /// Availability pass, then one pricing fetch per item.
    async fn priced_order(&self, request: &CreateOrderRequest) -> Result<Order> {
        for item in &request.items {
            let product_id = item.product_id;
            let available = self
                .guarded("check_availability", || {
                    self.catalog.check_availability(product_id)
                })
                .await?;
            if !available {
                return Err(OrchestratorError::ProductNotAvailable(product_id));
            }
        }

        let mut items = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product_id = item.product_id;
            let product = match self
                .guarded("get_product", || self.catalog.get_product(product_id))
                .await
            {
                Ok(product) => product,
                Err(CatalogError::NotFound(id)) => {
                    return Err(OrchestratorError::ProductNotAvailable(id));
                }
                Err(err) => return Err(err.into()),
            };
            let price = product.price();
            items.push(OrderItem::new(
                product_id,
                product.name,
                item.quantity,
                price,
                item.notes.clone(),
            )?);
        }

        Ok(Order::new(
            request.customer_id.clone(),
            items,
            request.notes.clone(),
        )?)
    }

    /// Degraded creation path: persist an unpriced pending order.
    async fn create_order_fallback(
        &self,
        request: &CreateOrderRequest,
        cause: &CatalogError,
        start: Instant,
    ) -> Result<Order> {
        tracing::warn!(error = %cause, "catalog unreachable, creating order in fallback mode");

        let mut items = Vec::with_capacity(request.items.len());
        for item in &request.items {
            items.push(OrderItem::unpriced(
                item.product_id,
                item.quantity,
                item.notes.clone(),
            )?);
        }
        let order = Order::degraded(
            request.customer_id.clone(),
            items,
            request.notes.clone(),
        )?;

        let order = self.repository.save(order).await?;
        self.cache.invalidate_all().await;
        let order_id = persisted_id(&order);

        metrics::counter!("orders_fallback_total").increment(1);
        metrics::histogram!("order_creation_seconds").record(start.elapsed().as_secs_f64());
        self.sink
            .publish(OrderNotification::CreatedPending {
                order_id,
                customer_id: order.customer_id().clone(),
            })
            .await;
        tracing::info!(%order_id, "degraded order created, pending reconciliation");
        Ok(order)
    }

    /// Creates the order on a detached task; the caller may await or drop
    /// the handle.
    pub fn spawn_create_order(&self, request: CreateOrderRequest) -> JoinHandle<Result<Order>>
    where
        R: 'static,
        C: 'static,
        N: 'static,
    {
        let this = self.clone();
        tokio::spawn(async move { this.create_order(request).await })
    }

    // -- Cancellation --

    /// Cancels an order, releasing reserved stock best-effort.
    ///
    /// Individual release failures are logged and skipped so the order
    /// still reaches a terminal state. If the circuit to the catalog is
    /// open, or the release phase exceeds the overall timeout, the
    /// cancellation is deferred to `PendingCancellation` instead of being
    /// lost.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId, reason: &str) -> Result<Order> {
        let start = Instant::now();
        let mut order = self.load(order_id).await?;
        if !order.can_be_cancelled() {
            return Err(OrderError::InvalidStateTransition {
                from: order.status(),
                action: "cancel",
            }
            .into());
        }

        if !self.breaker.allows_request().await {
            return self.cancel_order_fallback(order, reason, start).await;
        }

        let released = tokio::time::timeout(self.config.overall_timeout, async {
            for item in order.items() {
                let product_id = item.product_id;
                let quantity = item.quantity;
                if let Err(err) = self
                    .guarded("release_stock", || {
                        self.catalog.release_stock(product_id, quantity)
                    })
                    .await
                {
                    tracing::warn!(
                        %order_id,
                        %product_id,
                        quantity,
                        error = %err,
                        "stock release failed, continuing cancellation"
                    );
                }
            }
        })
        .await;
        if released.is_err() {
            tracing::warn!(%order_id, "stock release phase timed out");
            return self.cancel_order_fallback(order, reason, start).await;
        }

        order.cancel(reason)?;
        let order = self.repository.save(order).await?;
        self.cache.invalidate_all().await;

        metrics::counter!("orders_cancelled_total").increment(1);
        metrics::histogram!("order_cancellation_seconds").record(start.elapsed().as_secs_f64());
        self.sink
            .publish(OrderNotification::Cancelled {
                order_id,
                reason: reason.to_string(),
            })
            .await;
        tracing::info!(%order_id, reason, "order cancelled");
        Ok(order)
    }

    /// Deferred cancellation path taken while the circuit is open.
    async fn cancel_order_fallback(
        &self,
        mut order: Order,
        reason: &str,
        start: Instant,
    ) -> Result<Order> {
        let order_id = persisted_id(&order);

        // The degraded gateway refuses to release stock, which is exactly
        // why this cancellation must be deferred instead of completed.
        for item in order.items() {
            if let Err(err) = self
                .fallback
                .release_stock(item.product_id, item.quantity)
                .await
            {
                tracing::warn!(
                    %order_id,
                    product_id = %item.product_id,
                    error = %err,
                    "stock release unavailable"
                );
            }
        }

        order.mark_pending_cancellation(reason)?;
        let order = self.repository.save(order).await?;
        self.cache.invalidate_all().await;

        metrics::counter!("orders_pending_cancellation_total").increment(1);
        metrics::histogram!("order_cancellation_seconds").record(start.elapsed().as_secs_f64());
        self.sink
            .publish(OrderNotification::PendingCancellation {
                order_id,
                reason: reason.to_string(),
            })
            .await;
        tracing::info!(%order_id, reason, "cancellation deferred, catalog unreachable");
        Ok(order)
    }

    /// Cancels the order on a detached task.
    pub fn spawn_cancel_order(
        &self,
        order_id: OrderId,
        reason: String,
    ) -> JoinHandle<Result<Order>>
    where
        R: 'static,
        C: 'static,
        N: 'static,
    {
        let this = self.clone();
        tokio::spawn(async move { this.cancel_order(order_id, &reason).await })
    }

    // -- Local transitions --

    /// Confirms a pending order. No remote calls.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_order(&self, order_id: OrderId) -> Result<Order> {
        let mut order = self.load(order_id).await?;
        order.confirm()?;
        let order = self.repository.save(order).await?;
        self.cache.invalidate_all().await;

        metrics::counter!("orders_confirmed_total").increment(1);
        self.sink
            .publish(OrderNotification::Confirmed { order_id })
            .await;
        tracing::info!(%order_id, "order confirmed");
        Ok(order)
    }

    /// Marks a confirmed or in-delivery order as delivered. No remote calls.
    #[tracing::instrument(skip(self))]
    pub async fn mark_order_as_delivered(&self, order_id: OrderId) -> Result<Order> {
        let mut order = self.load(order_id).await?;
        order.mark_delivered()?;
        let order = self.repository.save(order).await?;
        self.cache.invalidate_all().await;

        metrics::counter!("orders_delivered_total").increment(1);
        self.sink
            .publish(OrderNotification::Delivered { order_id })
            .await;
        tracing::info!(%order_id, "order delivered");
        Ok(order)
    }

    // -- Reads --

    /// Fetches one order, via the read cache when possible.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order> {
        if let Some(order) = self.cache.get_order(order_id).await {
            return Ok(order);
        }
        let order = self.load(order_id).await?;
        self.cache.put_order(&order).await;
        Ok(order)
    }

    pub async fn get_all_orders(&self, page: PageRequest) -> Result<Page<Order>> {
        Ok(self.repository.find_all(page).await?)
    }

    /// Paginated orders for one customer, via the read cache when possible.
    pub async fn get_orders_by_customer(
        &self,
        customer_id: &CustomerId,
        page: PageRequest,
    ) -> Result<Page<Order>> {
        if let Some(cached) = self.cache.get_customer_page(customer_id, page).await {
            return Ok(cached);
        }
        let result = self.repository.find_by_customer(customer_id, page).await?;
        self.cache.put_customer_page(customer_id, page, &result).await;
        Ok(result)
    }

    pub async fn get_orders_by_status(
        &self,
        status: OrderStatus,
        page: PageRequest,
    ) -> Result<Page<Order>> {
        Ok(self.repository.find_by_status(status, page).await?)
    }

    /// Aggregate per-status counts and derived rates.
    pub async fn get_order_statistics(&self) -> Result<OrderStatistics> {
        let total = self.repository.count().await?;
        let pending = self.repository.count_by_status(OrderStatus::Pending).await?;
        let confirmed = self
            .repository
            .count_by_status(OrderStatus::Confirmed)
            .await?;
        let delivered = self
            .repository
            .count_by_status(OrderStatus::Delivered)
            .await?;
        let cancelled = self
            .repository
            .count_by_status(OrderStatus::Cancelled)
            .await?;
        let pending_cancellation = self
            .repository
            .count_by_status(OrderStatus::PendingCancellation)
            .await?;
        Ok(OrderStatistics::new(
            total,
            pending,
            confirmed,
            delivered,
            cancelled,
            pending_cancellation,
        ))
    }

    // -- Internals --

    async fn load(&self, order_id: OrderId) -> Result<Order> {
        self.repository
            .find_by_id(order_id)
            .await?
            .ok_or(OrchestratorError::OrderNotFound(order_id))
    }

    /// Runs one catalog call under the circuit breaker, the per-call
    /// timeout, and bounded retries with fixed backoff.
    ///
    /// Only transient failures (`Unavailable`, timeouts) are retried and
    /// counted against the breaker; `NotFound` passes through untouched.
    async fn guarded<T, F, Fut>(&self, op: &'static str, mut call: F) -> catalog::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = catalog::Result<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            if !self.breaker.allows_request().await {
                return Err(CatalogError::Unavailable("circuit open".to_string()));
            }

            let failure = match tokio::time::timeout(self.config.timeout, call()).await {
                Ok(Ok(value)) => {
                    self.breaker.record_success().await;
                    return Ok(value);
                }
                Ok(Err(err)) if err.is_transient() => err,
                Ok(Err(err)) => return Err(err),
                Err(_) => CatalogError::Unavailable(format!("{op} timed out")),
            };

            self.breaker.record_failure().await;
            if attempt >= self.config.max_retries {
                return Err(failure);
            }
            attempt += 1;
            tracing::warn!(op, attempt, error = %failure, "catalog call failed, retrying");
            tokio::time::sleep(self.config.backoff).await;
        }
    }
}

/// Identity of an order returned by a repository save. Saves always assign
/// one; the nil placeholder only guards against a misbehaving repository.
fn persisted_id(order: &Order) -> OrderId {
    order.id().unwrap_or_else(OrderId::nil)
}
