//! Process-local storefront.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::catalog::{CatalogService, Product, StockRecord, StockService};
use crate::error::ServiceError;
use crate::ids::ProductId;

/// Catalog and stock held in memory.
///
/// Products without a stock entry report zero units. Can be switched into an
/// unavailable state to exercise failure handling.
#[derive(Debug, Default)]
pub struct InMemoryStorefront {
    products: RwLock<HashMap<ProductId, Product>>,
    stock: RwLock<HashMap<ProductId, i64>>,
    unavailable: AtomicBool,
    lookups: AtomicUsize,
}

impl InMemoryStorefront {
    /// Create an empty storefront.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with the given stock level.
    pub fn with_product(self, product: Product, stock: i64) -> Self {
        self.insert_product(product, stock);
        self
    }

    /// Add or replace a product and its stock level.
    pub fn insert_product(&self, product: Product, stock: i64) {
        let id = product.id;
        if let Ok(mut products) = self.products.write() {
            products.insert(id, product);
        }
        self.set_stock(id, stock);
    }

    /// Set the stock level for a product.
    pub fn set_stock(&self, id: ProductId, amount: i64) {
        if let Ok(mut stock) = self.stock.write() {
            stock.insert(id, amount);
        }
    }

    /// Make every lookup fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of catalog and stock lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), ServiceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("storefront offline".to_string()));
        }
        Ok(())
    }
}

fn poisoned() -> ServiceError {
    ServiceError::Unavailable("storefront lock poisoned".to_string())
}

#[async_trait]
impl CatalogService for InMemoryStorefront {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, ServiceError> {
        self.check_available()?;
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products.get(&id).cloned())
    }
}

#[async_trait]
impl StockService for InMemoryStorefront {
    async fn stock(&self, id: ProductId) -> Result<StockRecord, ServiceError> {
        self.check_available()?;
        let stock = self.stock.read().map_err(|_| poisoned())?;
        Ok(StockRecord::new(id, stock.get(&id).copied().unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookups() {
        let storefront =
            InMemoryStorefront::new().with_product(Product::new(1u64).with_detail("title", "Shoe"), 5);

        let product = storefront.product(ProductId::new(1)).await.unwrap();
        assert_eq!(product.unwrap().title(), Some("Shoe"));
        assert!(storefront.product(ProductId::new(2)).await.unwrap().is_none());

        assert_eq!(storefront.stock(ProductId::new(1)).await.unwrap().amount, 5);
        assert_eq!(storefront.stock(ProductId::new(2)).await.unwrap().amount, 0);
        assert_eq!(storefront.lookups(), 4);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let storefront = InMemoryStorefront::new();
        storefront.set_unavailable(true);
        assert!(matches!(
            storefront.stock(ProductId::new(1)).await,
            Err(ServiceError::Unavailable(_))
        ));
        storefront.set_unavailable(false);
        assert!(storefront.stock(ProductId::new(1)).await.is_ok());
    }
}
