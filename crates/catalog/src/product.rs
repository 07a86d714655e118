use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// Product representation returned by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Units currently in stock.
    pub stock: u32,

    /// Optional category label.
    #[serde(default)]
    pub category: Option<String>,

    /// False for delisted or sentinel products.
    pub is_active: bool,
}

impl Product {
    /// Returns the unit price as money.
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// The sentinel product returned by the fallback gateway.
    ///
    /// Zero price, no stock, inactive, marked unavailable; never a valid
    /// basis for pricing an order.
    pub fn unavailable(id: ProductId) -> Self {
        Self {
            id,
            name: "Product Unavailable".to_string(),
            description: Some("Product service is currently unavailable".to_string()),
            price_cents: 0,
            stock: 0,
            category: None,
            is_active: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_product_is_inert() {
        let p = Product::unavailable(ProductId::new(9));
        assert_eq!(p.id, ProductId::new(9));
        assert!(p.price().is_zero());
        assert_eq!(p.stock, 0);
        assert!(!p.is_active);
    }

    #[test]
    fn deserializes_wire_payload() {
        let json = r#"{
            "id": 42,
            "name": "Widget",
            "price_cents": 999,
            "stock": 10,
            "is_active": true
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, ProductId::new(42));
        assert_eq!(p.price().cents(), 999);
        assert_eq!(p.description, None);
    }
}
