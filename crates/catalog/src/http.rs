use std::time::Duration;

use async_trait::async_trait;
use common::ProductId;
use reqwest::{Client, Response, StatusCode};

use crate::error::{CatalogError, Result};
use crate::gateway::CatalogGateway;
use crate::product::Product;

/// HTTP client for the product catalog service.
///
/// Wire contract:
/// - `GET  {base}/products/{id}`
/// - `GET  {base}/products/{id}/availability`
/// - `GET  {base}/products/{id}/can-reserve?quantity=N`
/// - `POST {base}/products/{id}/reserve?quantity=N`
/// - `POST {base}/products/{id}/release?quantity=N`
///
/// Non-2xx responses and transport errors are treated uniformly as
/// `CatalogError::Unavailable`, except a 404 from `get_product` which maps
/// to `CatalogError::NotFound`.
#[derive(Clone)]
pub struct HttpCatalogGateway {
    client: Client,
    base_url: String,
}

impl HttpCatalogGateway {
    /// Creates a gateway for the catalog at `base_url` (no trailing slash)
    /// with a per-request timeout.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Unavailable(format!(
                "catalog returned {status}"
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("invalid catalog response: {e}")))
    }
}

fn transport_error(e: reqwest::Error) -> CatalogError {
    CatalogError::Unavailable(e.to_string())
}

#[async_trait]
impl CatalogGateway for HttpCatalogGateway {
    async fn check_availability(&self, product_id: ProductId) -> Result<bool> {
        let response = self
            .client
            .get(self.url(&format!("/products/{product_id}/availability")))
            .send()
            .await
            .map_err(transport_error)?;
        Self::parse_json(response).await
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        let response = self
            .client
            .get(self.url(&format!("/products/{product_id}")))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(product_id));
        }
        Self::parse_json(response).await
    }

    async fn can_reserve(&self, product_id: ProductId, quantity: u32) -> Result<bool> {
        let response = self
            .client
            .get(self.url(&format!("/products/{product_id}/can-reserve")))
            .query(&[("quantity", quantity)])
            .send()
            .await
            .map_err(transport_error)?;
        Self::parse_json(response).await
    }

    async fn reserve_stock(&self, product_id: ProductId, quantity: u32) -> Result<Product> {
        tracing::debug!(%product_id, quantity, "reserving stock");
        let response = self
            .client
            .post(self.url(&format!("/products/{product_id}/reserve")))
            .query(&[("quantity", quantity)])
            .send()
            .await
            .map_err(transport_error)?;
        Self::parse_json(response).await
    }

    async fn release_stock(&self, product_id: ProductId, quantity: u32) -> Result<Product> {
        tracing::debug!(%product_id, quantity, "releasing stock");
        let response = self
            .client
            .post(self.url(&format!("/products/{product_id}/release")))
            .query(&[("quantity", quantity)])
            .send()
            .await
            .map_err(transport_error)?;
        Self::parse_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_maps_to_unavailable() {
        // Reserved TEST-NET-1 address; nothing listens there.
        let gateway =
            HttpCatalogGateway::new("http://192.0.2.1:1", Duration::from_millis(100)).unwrap();

        let result = gateway.check_availability(ProductId::new(1)).await;
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));

        let result = gateway.get_product(ProductId::new(1)).await;
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    }

    #[test]
    fn urls_follow_wire_contract() {
        let gateway =
            HttpCatalogGateway::new("http://catalog:8080", Duration::from_secs(1)).unwrap();
        assert_eq!(
            gateway.url("/products/42/availability"),
            "http://catalog:8080/products/42/availability"
        );
    }
}
