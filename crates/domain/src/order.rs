//! Order aggregate root and its owned line items.

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, ProductId, Version};
use serde::{Deserialize, Serialize};

use crate::error::{OrderError, Result};
use crate::status::OrderStatus;

/// Maximum characters allowed in notes and cancellation reasons.
const MAX_NOTES_LEN: usize = 500;

/// Maximum quantity per line item.
const MAX_QUANTITY: u32 = 1000;

fn validate_notes(notes: &Option<String>) -> Result<()> {
    if let Some(n) = notes {
        let len = n.chars().count();
        if len > MAX_NOTES_LEN {
            return Err(OrderError::NotesTooLong(len));
        }
    }
    Ok(())
}

/// A line item owned by exactly one order.
///
/// The item total is always `unit_price * quantity`; it is computed, never
/// stored, so the invariant cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Reference to a product in the remote catalog.
    pub product_id: ProductId,

    /// Product name as priced at order time.
    pub product_name: String,

    /// Quantity ordered (1..=1000).
    pub quantity: u32,

    /// Price per unit at order time.
    pub unit_price: Money,

    /// Optional free-form note.
    pub notes: Option<String>,
}

impl OrderItem {
    /// Creates a priced line item, validating quantity, price, and notes.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
        notes: Option<String>,
    ) -> Result<Self> {
        if quantity == 0 || quantity > MAX_QUANTITY {
            return Err(OrderError::InvalidQuantity { quantity });
        }
        if !unit_price.is_positive() || unit_price > Money::MAX {
            return Err(OrderError::InvalidPrice {
                price_cents: unit_price.cents(),
            });
        }
        validate_notes(&notes)?;
        Ok(Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
            notes,
        })
    }

    /// Creates an unpriced line item for the degraded creation path.
    ///
    /// The catalog could not be reached, so the item carries a zero price,
    /// a placeholder name, and a note marking the price for reconciliation.
    pub fn unpriced(product_id: ProductId, quantity: u32, notes: Option<String>) -> Result<Self> {
        if quantity == 0 || quantity > MAX_QUANTITY {
            return Err(OrderError::InvalidQuantity { quantity });
        }
        let marker = match notes {
            Some(n) => format!("Price to be determined - {n}"),
            None => "Price to be determined".to_string(),
        };
        Ok(Self {
            product_id,
            product_name: format!("Product {product_id}"),
            quantity,
            unit_price: Money::zero(),
            notes: Some(marker),
        })
    }

    /// Returns the total price for this item (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Order aggregate root.
///
/// Owns its line items exclusively; the status field only changes through
/// the transition methods below. The identity and version are assigned by
/// the repository at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: Option<OrderId>,
    customer_id: CustomerId,
    status: OrderStatus,
    total_amount: Money,
    notes: Option<String>,
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: Version,
    items: Vec<OrderItem>,
}

impl Order {
    /// Creates a priced order in `Pending` status.
    ///
    /// The total is the sum of the item totals at this moment; it is not
    /// re-derived afterwards.
    pub fn new(customer_id: CustomerId, items: Vec<OrderItem>, notes: Option<String>) -> Result<Self> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }
        validate_notes(&notes)?;

        let mut total = Money::zero();
        for item in &items {
            total += item.total_price();
        }
        if total > Money::MAX {
            return Err(OrderError::TotalTooLarge {
                total_cents: total.cents(),
            });
        }

        let now = Utc::now();
        Ok(Self {
            id: None,
            customer_id,
            status: OrderStatus::Pending,
            total_amount: total,
            notes,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
            version: Version::initial(),
            items,
        })
    }

    /// Creates a degraded order for the fallback creation path.
    ///
    /// Items are unpriced (zero total) and the note marks the order for
    /// later reconciliation. Status is `Pending` like a regular creation.
    pub fn degraded(
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        notes: Option<String>,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }
        let marker = match notes {
            Some(n) => format!("Order created in fallback mode - {n}"),
            None => "Order created in fallback mode".to_string(),
        };
        validate_notes(&Some(marker.clone()))?;

        let now = Utc::now();
        Ok(Self {
            id: None,
            customer_id,
            status: OrderStatus::Pending,
            total_amount: Money::zero(),
            notes: Some(marker),
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
            version: Version::initial(),
            items,
        })
    }

    // -- Accessors --

    /// Order identity; `None` until the first save.
    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    // -- Transitions --

    /// Returns true if the order may still be cancelled.
    pub fn can_be_cancelled(&self) -> bool {
        self.status.can_be_cancelled()
    }

    /// Confirms a pending order.
    pub fn confirm(&mut self) -> Result<()> {
        if !self.status.can_be_confirmed() {
            return Err(OrderError::InvalidStateTransition {
                from: self.status,
                action: "confirm",
            });
        }
        self.status = OrderStatus::Confirmed;
        Ok(())
    }

    /// Cancels a pending or confirmed order, recording the reason.
    pub fn cancel(&mut self, reason: impl Into<String>) -> Result<()> {
        if !self.status.can_be_cancelled() {
            return Err(OrderError::InvalidStateTransition {
                from: self.status,
                action: "cancel",
            });
        }
        self.status = OrderStatus::Cancelled;
        self.cancellation_reason = Some(reason.into());
        Ok(())
    }

    /// Marks a confirmed or in-delivery order as delivered.
    pub fn mark_delivered(&mut self) -> Result<()> {
        if !self.status.can_be_delivered() {
            return Err(OrderError::InvalidStateTransition {
                from: self.status,
                action: "deliver",
            });
        }
        self.status = OrderStatus::Delivered;
        Ok(())
    }

    /// Defers a cancellation that could not reach the remote catalog.
    ///
    /// The reason is prefixed to mark the cancellation as provisional; a
    /// reconciliation process completes it later.
    pub fn mark_pending_cancellation(&mut self, reason: impl Into<String>) -> Result<()> {
        if !self.status.can_be_cancelled() {
            return Err(OrderError::InvalidStateTransition {
                from: self.status,
                action: "cancel",
            });
        }
        self.status = OrderStatus::PendingCancellation;
        self.cancellation_reason = Some(format!("Pending cancellation - {}", reason.into()));
        Ok(())
    }

    // -- Repository hooks --

    /// Records identity, version, and timestamp assigned by a save.
    ///
    /// Called by the repository only.
    pub fn mark_persisted(&mut self, id: OrderId, version: Version, updated_at: DateTime<Utc>) {
        self.id = Some(id);
        self.version = version;
        self.updated_at = updated_at;
    }

    /// Rebuilds an order from persisted state. Repository use only.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: OrderId,
        customer_id: CustomerId,
        status: OrderStatus,
        total_amount: Money,
        notes: Option<String>,
        cancellation_reason: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        version: Version,
        items: Vec<OrderItem>,
    ) -> Self {
        Self {
            id: Some(id),
            customer_id,
            status,
            total_amount,
            notes,
            cancellation_reason,
            created_at,
            updated_at,
            version,
            items,
        }
    }
}
