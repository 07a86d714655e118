//! Order lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Status transitions:
/// ```text
/// Pending ──┬──► Confirmed ──► ... ──► InDelivery ──► Delivered
///           │        │                     │
///           │        ├─────────────────────┴──► Delivered
///           ├────────┴──► Cancelled
///           └────────┴──► PendingCancellation   (fallback only)
/// ```
///
/// `Delivered`, `Cancelled`, and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order created, awaiting confirmation.
    #[default]
    Pending,

    /// Order confirmed, being processed.
    Confirmed,

    /// Order is being prepared.
    Preparing,

    /// Order is packed and ready to ship.
    ReadyForDelivery,

    /// Order is out for delivery.
    InDelivery,

    /// Order reached the customer (terminal).
    Delivered,

    /// Order was cancelled (terminal).
    Cancelled,

    /// Cancellation requested but stock release is deferred; reconciled later.
    PendingCancellation,

    /// Order processing failed (terminal).
    Failed,
}

impl OrderStatus {
    /// Returns true if the order can be confirmed from this status.
    pub fn can_be_confirmed(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if the order can be cancelled from this status.
    pub fn can_be_cancelled(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    /// Returns true if the order can be marked delivered from this status.
    pub fn can_be_delivered(&self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::InDelivery)
    }

    /// Returns true if this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Failed
        )
    }

    /// Returns true if the order is still moving through fulfillment.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending
                | OrderStatus::Confirmed
                | OrderStatus::Preparing
                | OrderStatus::ReadyForDelivery
                | OrderStatus::InDelivery
        )
    }

    /// Returns the status name as stored and exposed on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::ReadyForDelivery => "READY_FOR_DELIVERY",
            OrderStatus::InDelivery => "IN_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::PendingCancellation => "PENDING_CANCELLATION",
            OrderStatus::Failed => "FAILED",
        }
    }

    /// Parses a status from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "CONFIRMED" => Some(OrderStatus::Confirmed),
            "PREPARING" => Some(OrderStatus::Preparing),
            "READY_FOR_DELIVERY" => Some(OrderStatus::ReadyForDelivery),
            "IN_DELIVERY" => Some(OrderStatus::InDelivery),
            "DELIVERED" => Some(OrderStatus::Delivered),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            "PENDING_CANCELLATION" => Some(OrderStatus::PendingCancellation),
            "FAILED" => Some(OrderStatus::Failed),
            _ => None,
        }
    }

    /// All statuses, in lifecycle order.
    pub fn all() -> [OrderStatus; 9] {
        [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::ReadyForDelivery,
            OrderStatus::InDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::PendingCancellation,
            OrderStatus::Failed,
        ]
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn only_pending_can_be_confirmed() {
        for status in OrderStatus::all() {
            assert_eq!(status.can_be_confirmed(), status == OrderStatus::Pending);
        }
    }

    #[test]
    fn pending_and_confirmed_can_be_cancelled() {
        assert!(OrderStatus::Pending.can_be_cancelled());
        assert!(OrderStatus::Confirmed.can_be_cancelled());
        assert!(!OrderStatus::Preparing.can_be_cancelled());
        assert!(!OrderStatus::InDelivery.can_be_cancelled());
        assert!(!OrderStatus::Delivered.can_be_cancelled());
        assert!(!OrderStatus::Cancelled.can_be_cancelled());
        assert!(!OrderStatus::PendingCancellation.can_be_cancelled());
        assert!(!OrderStatus::Failed.can_be_cancelled());
    }

    #[test]
    fn confirmed_and_in_delivery_can_be_delivered() {
        assert!(OrderStatus::Confirmed.can_be_delivered());
        assert!(OrderStatus::InDelivery.can_be_delivered());
        assert!(!OrderStatus::Pending.can_be_delivered());
        assert!(!OrderStatus::Delivered.can_be_delivered());
        assert!(!OrderStatus::Cancelled.can_be_delivered());
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Failed.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::PendingCancellation.is_terminal());
    }

    #[test]
    fn active_statuses() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Confirmed.is_active());
        assert!(OrderStatus::Preparing.is_active());
        assert!(OrderStatus::ReadyForDelivery.is_active());
        assert!(OrderStatus::InDelivery.is_active());
        assert!(!OrderStatus::Delivered.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
        assert!(!OrderStatus::PendingCancellation.is_active());
        assert!(!OrderStatus::Failed.is_active());
    }

    #[test]
    fn as_str_parse_roundtrip() {
        for status in OrderStatus::all() {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("SHIPPED"), None);
    }

    #[test]
    fn serialization_uses_wire_names() {
        let json = serde_json::to_string(&OrderStatus::ReadyForDelivery).unwrap();
        assert_eq!(json, "\"READY_FOR_DELIVERY\"");
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderStatus::ReadyForDelivery);
    }
}
