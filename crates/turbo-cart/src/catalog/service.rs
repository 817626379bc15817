//! Service ports for remote catalog and stock lookups.

use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::{Product, StockRecord};
use crate::error::ServiceError;
use crate::ids::ProductId;

/// Remote-authoritative source of product display and pricing data.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Look up a product by id.
    ///
    /// `Ok(None)` means the catalog has no such product.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, ServiceError>;
}

/// Remote-authoritative count of units available per product.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Look up the current stock record for a product.
    async fn stock(&self, id: ProductId) -> Result<StockRecord, ServiceError>;
}

#[async_trait]
impl<T: CatalogService + ?Sized> CatalogService for Arc<T> {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, ServiceError> {
        (**self).product(id).await
    }
}

#[async_trait]
impl<T: StockService + ?Sized> StockService for Arc<T> {
    async fn stock(&self, id: ProductId) -> Result<StockRecord, ServiceError> {
        (**self).stock(id).await
    }
}
