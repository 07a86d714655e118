use async_trait::async_trait;
use common::ProductId;

use crate::error::{CatalogError, Result};
use crate::gateway::CatalogGateway;
use crate::product::Product;

/// Degraded-mode substitute for the catalog, used while the circuit to
/// the product service is open.
///
/// Reads fail closed: availability and reservation checks report false,
/// and `get_product` returns an inactive zero-priced sentinel. The two
/// mutating calls refuse outright rather than guess at remote state.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCatalog;

impl FallbackCatalog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogGateway for FallbackCatalog {
    async fn check_availability(&self, product_id: ProductId) -> Result<bool> {
        tracing::warn!(%product_id, "fallback: cannot check availability");
        Ok(false)
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        tracing::warn!(%product_id, "fallback: returning sentinel product");
        Ok(Product::unavailable(product_id))
    }

    async fn can_reserve(&self, product_id: ProductId, quantity: u32) -> Result<bool> {
        tracing::warn!(%product_id, quantity, "fallback: cannot check reservation");
        Ok(false)
    }

    async fn reserve_stock(&self, product_id: ProductId, quantity: u32) -> Result<Product> {
        tracing::warn!(%product_id, quantity, "fallback: cannot reserve stock");
        Err(CatalogError::Unavailable(
            "product service unavailable - cannot reserve stock".to_string(),
        ))
    }

    async fn release_stock(&self, product_id: ProductId, quantity: u32) -> Result<Product> {
        tracing::warn!(%product_id, quantity, "fallback: cannot release stock");
        Err(CatalogError::Unavailable(
            "product service unavailable - cannot release stock".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_fail_closed() {
        let fallback = FallbackCatalog::new();
        assert!(!fallback.check_availability(ProductId::new(1)).await.unwrap());
        assert!(!fallback.can_reserve(ProductId::new(1), 5).await.unwrap());
    }

    #[tokio::test]
    async fn get_product_returns_sentinel() {
        let fallback = FallbackCatalog::new();
        let product = fallback.get_product(ProductId::new(3)).await.unwrap();
        assert_eq!(product.name, "Product Unavailable");
        assert!(product.price().is_zero());
        assert!(!product.is_active);
    }

    #[tokio::test]
    async fn mutations_refuse() {
        let fallback = FallbackCatalog::new();
        assert!(matches!(
            fallback.reserve_stock(ProductId::new(1), 2).await,
            Err(CatalogError::Unavailable(_))
        ));
        assert!(matches!(
            fallback.release_stock(ProductId::new(1), 2).await,
            Err(CatalogError::Unavailable(_))
        ));
    }
}
