//! HTTP storefront adapter.

use std::time::Duration;

use async_trait::async_trait;
use turbo_data::{FetchClient, RetryPolicy};

use crate::catalog::{CatalogService, Product, StockRecord, StockService};
use crate::config::ApiConfig;
use crate::error::ServiceError;
use crate::ids::ProductId;

/// Catalog and stock lookups against a REST storefront API.
///
/// Expects `GET {base}/products/{id}` and `GET {base}/stock/{id}`, each
/// returning a single JSON record.
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    client: FetchClient,
}

impl StorefrontApi {
    /// Wrap an already configured client.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    /// Build a client from API configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ServiceError> {
        let client = FetchClient::new(Duration::from_millis(config.timeout_ms))?
            .with_base_url(config.base_url.clone())
            .with_default_header("Accept", "application/json")
            .with_retry_policy(RetryPolicy::new(config.max_retries));
        Ok(Self::new(client))
    }

    /// Path of a product record.
    pub fn product_path(id: ProductId) -> String {
        format!("products/{}", id)
    }

    /// Path of a stock record.
    pub fn stock_path(id: ProductId) -> String {
        format!("stock/{}", id)
    }

    /// The underlying client.
    pub fn client(&self) -> &FetchClient {
        &self.client
    }
}

#[async_trait]
impl CatalogService for StorefrontApi {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, ServiceError> {
        let product = self
            .client
            .get_optional_json::<Product>(&Self::product_path(id))
            .await?;
        Ok(product)
    }
}

#[async_trait]
impl StockService for StorefrontApi {
    async fn stock(&self, id: ProductId) -> Result<StockRecord, ServiceError> {
        self.client
            .get_optional_json::<StockRecord>(&Self::stock_path(id))
            .await?
            .ok_or_else(|| ServiceError::Unexpected(format!("no stock record for product {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(StorefrontApi::product_path(ProductId::new(3)), "products/3");
        assert_eq!(StorefrontApi::stock_path(ProductId::new(3)), "stock/3");
    }

    #[test]
    fn test_from_config_uses_base_url() {
        let config = ApiConfig {
            base_url: "http://localhost:3333/".to_string(),
            ..ApiConfig::default()
        };
        let api = StorefrontApi::from_config(&config).unwrap();
        assert_eq!(
            api.client().url(&StorefrontApi::stock_path(ProductId::new(1))),
            "http://localhost:3333/stock/1"
        );
    }
}
