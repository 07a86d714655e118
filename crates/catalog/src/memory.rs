use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ProductId;

use crate::error::{CatalogError, Result};
use crate::gateway::CatalogGateway;
use crate::product::Product;

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    reserve_calls: Vec<(ProductId, u32)>,
    release_calls: Vec<(ProductId, u32)>,
    unavailable: bool,
    failures_remaining: u32,
    fail_on_reserve: bool,
    fail_on_release: bool,
}

impl InMemoryCatalogState {
    /// Consumes one scripted failure, or reports a permanent outage.
    fn check_reachable(&mut self) -> Result<()> {
        if self.unavailable {
            return Err(CatalogError::Unavailable("connection refused".to_string()));
        }
        if self.failures_remaining > 0 {
            self.failures_remaining -= 1;
            return Err(CatalogError::Unavailable("connection reset".to_string()));
        }
        Ok(())
    }
}

/// In-memory catalog for testing.
///
/// Seeded with products and scriptable failures so orchestration tests can
/// exercise retry, breaker, and fallback paths deterministically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalog {
    /// Creates a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product to the catalog, builder style.
    pub fn with_product(
        self,
        id: u64,
        name: impl Into<String>,
        price_cents: i64,
        stock: u32,
    ) -> Self {
        self.add_product(id, name, price_cents, stock);
        self
    }

    /// Adds or replaces a product on an existing catalog.
    pub fn add_product(&self, id: u64, name: impl Into<String>, price_cents: i64, stock: u32) {
        let mut state = self.state.write().unwrap();
        state.products.insert(
            ProductId::new(id),
            Product {
                id: ProductId::new(id),
                name: name.into(),
                description: None,
                price_cents,
                stock,
                category: None,
                is_active: true,
            },
        );
    }

    /// Makes every call fail with `Unavailable` until switched off.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    /// Makes the next `n` calls fail with `Unavailable`, then recover.
    pub fn fail_next_calls(&self, n: u32) {
        self.state.write().unwrap().failures_remaining = n;
    }

    /// Makes reserve calls fail while the rest of the catalog works.
    pub fn set_fail_on_reserve(&self, fail: bool) {
        self.state.write().unwrap().fail_on_reserve = fail;
    }

    /// Makes release calls fail while the rest of the catalog works.
    pub fn set_fail_on_release(&self, fail: bool) {
        self.state.write().unwrap().fail_on_release = fail;
    }

    /// Marks a product inactive without removing it.
    pub fn deactivate(&self, id: u64) {
        if let Some(p) = self
            .state
            .write()
            .unwrap()
            .products
            .get_mut(&ProductId::new(id))
        {
            p.is_active = false;
        }
    }

    /// Every `(product, quantity)` reserve call issued so far.
    pub fn reserve_calls(&self) -> Vec<(ProductId, u32)> {
        self.state.read().unwrap().reserve_calls.clone()
    }

    /// Every `(product, quantity)` release call issued so far.
    pub fn release_calls(&self) -> Vec<(ProductId, u32)> {
        self.state.read().unwrap().release_calls.clone()
    }

    /// Current stock of a product, if it exists.
    pub fn stock_of(&self, id: u64) -> Option<u32> {
        self.state
            .read()
            .unwrap()
            .products
            .get(&ProductId::new(id))
            .map(|p| p.stock)
    }
}

#[async_trait]
impl CatalogGateway for InMemoryCatalog {
    async fn check_availability(&self, product_id: ProductId) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        state.check_reachable()?;
        Ok(state
            .products
            .get(&product_id)
            .is_some_and(|p| p.is_active && p.stock > 0))
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        let mut state = self.state.write().unwrap();
        state.check_reachable()?;
        state
            .products
            .get(&product_id)
            .cloned()
            .ok_or(CatalogError::NotFound(product_id))
    }

    async fn can_reserve(&self, product_id: ProductId, quantity: u32) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        state.check_reachable()?;
        Ok(state
            .products
            .get(&product_id)
            .is_some_and(|p| p.is_active && p.stock >= quantity))
    }

    async fn reserve_stock(&self, product_id: ProductId, quantity: u32) -> Result<Product> {
        let mut state = self.state.write().unwrap();
        state.check_reachable()?;
        if state.fail_on_reserve {
            return Err(CatalogError::Unavailable(
                "reserve endpoint down".to_string(),
            ));
        }
        state.reserve_calls.push((product_id, quantity));
        let product = state
            .products
            .get_mut(&product_id)
            .ok_or(CatalogError::NotFound(product_id))?;
        product.stock = product.stock.saturating_sub(quantity);
        Ok(product.clone())
    }

    async fn release_stock(&self, product_id: ProductId, quantity: u32) -> Result<Product> {
        let mut state = self.state.write().unwrap();
        state.check_reachable()?;
        if state.fail_on_release {
            return Err(CatalogError::Unavailable(
                "release endpoint down".to_string(),
            ));
        }
        state.release_calls.push((product_id, quantity));
        let product = state
            .products
            .get_mut(&product_id)
            .ok_or(CatalogError::NotFound(product_id))?;
        product.stock += quantity;
        Ok(product.clone())
    }
}
