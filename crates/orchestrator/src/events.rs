//! Lifecycle notifications published by the orchestrator.
//!
//! Delivery is fire-and-forget: notifications are emitted after the state
//! change is persisted and are never part of the transaction.

use async_trait::async_trait;
use common::{CustomerId, OrderId};
use serde::{Deserialize, Serialize};

/// Events emitted as orders move through their lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderNotification {
    /// A priced order was created.
    Created {
        order_id: OrderId,
        customer_id: CustomerId,
        total_cents: i64,
    },
    /// A degraded order was created while the catalog was unreachable;
    /// pricing awaits reconciliation.
    CreatedPending {
        order_id: OrderId,
        customer_id: CustomerId,
    },
    /// The order was confirmed.
    Confirmed { order_id: OrderId },
    /// The order was cancelled.
    Cancelled { order_id: OrderId, reason: String },
    /// Cancellation was deferred because stock could not be released.
    PendingCancellation { order_id: OrderId, reason: String },
    /// The order was delivered.
    Delivered { order_id: OrderId },
}

impl OrderNotification {
    /// Stable name used for logging and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::CreatedPending { .. } => "created_pending",
            Self::Confirmed { .. } => "confirmed",
            Self::Cancelled { .. } => "cancelled",
            Self::PendingCancellation { .. } => "pending_cancellation",
            Self::Delivered { .. } => "delivered",
        }
    }

    /// The order this notification concerns.
    pub fn order_id(&self) -> OrderId {
        match self {
            Self::Created { order_id, .. }
            | Self::CreatedPending { order_id, .. }
            | Self::Confirmed { order_id }
            | Self::Cancelled { order_id, .. }
            | Self::PendingCancellation { order_id, .. }
            | Self::Delivered { order_id } => *order_id,
        }
    }
}

/// Destination for lifecycle notifications.
///
/// Implementations must not fail the calling operation; anything that can
/// go wrong downstream is the sink's problem to log.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, notification: OrderNotification);
}

/// Sink that emits each notification as a structured log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for TracingSink {
    async fn publish(&self, notification: OrderNotification) {
        tracing::info!(
            kind = notification.kind(),
            order_id = %notification.order_id(),
            "order notification"
        );
    }
}

/// Sink that records notifications in memory for test assertions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    published: std::sync::Arc<std::sync::Mutex<Vec<OrderNotification>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far, in order.
    pub fn published(&self) -> Vec<OrderNotification> {
        self.published.lock().unwrap().clone()
    }

    /// Kinds of everything published so far, in order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.published.lock().unwrap().iter().map(|n| n.kind()).collect()
    }
}

#[async_trait]
impl NotificationSink for InMemorySink {
    async fn publish(&self, notification: OrderNotification) {
        self.published.lock().unwrap().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_sink_records_in_order() {
        let sink = InMemorySink::new();
        let order_id = OrderId::new();

        sink.publish(OrderNotification::Confirmed { order_id }).await;
        sink.publish(OrderNotification::Delivered { order_id }).await;

        assert_eq!(sink.kinds(), vec!["confirmed", "delivered"]);
        assert_eq!(sink.published()[0].order_id(), order_id);
    }

    #[test]
    fn notifications_serialize_with_type_tag() {
        let n = OrderNotification::Cancelled {
            order_id: OrderId::new(),
            reason: "late".to_string(),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "cancelled");
        assert_eq!(json["reason"], "late");
    }
}
