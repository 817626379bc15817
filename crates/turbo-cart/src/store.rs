//! The cart store: shared cart state plus its three mutations.
//!
//! ```text
//! UI action ──► CartStore::add_product / remove_product / update_product_amount
//!                  │  (mutation lock held for the whole operation)
//!                  ├─► CatalogService::product   (add, new products only)
//!                  ├─► StockService::stock       (add, update)
//!                  ├─► Cache::set(snapshot)      (success path)
//!                  └─► watch::Sender::send_replace(cart)
//!               failures ──► Notifier::notify(Notice)
//! ```

use std::fmt;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use turbo_cache::{Cache, Storage};

use crate::cart::{Cart, CartItem, UpdateProductAmount};
use crate::catalog::{CatalogService, StockRecord, StockService};
use crate::config::DEFAULT_CART_KEY;
use crate::error::{CartError, ErrorCategory, ServiceError};
use crate::ids::ProductId;
use crate::notify::{Notice, Notifier, TracingNotifier};

/// Handle to a shared shopping cart.
///
/// Cloning is cheap and every clone refers to the same cart. Mutations are
/// serialized: each one observes the cart as left by the previous one, so
/// concurrent calls never overwrite each other's changes.
///
/// None of the operations return an error. Failures are reported to the
/// configured [`Notifier`] and leave both the cart and its snapshot as they
/// were.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

struct Inner {
    catalog: Arc<dyn CatalogService>,
    stock: Arc<dyn StockService>,
    cache: Cache<Arc<dyn Storage>>,
    key: String,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<Cart>,
    mutation: Mutex<()>,
}

/// Builder for [`CartStore`].
pub struct CartStoreBuilder {
    catalog: Arc<dyn CatalogService>,
    stock: Arc<dyn StockService>,
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    key: String,
}

impl CartStoreBuilder {
    /// Set the notification sink. Defaults to [`TracingNotifier`].
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Set the snapshot key. Defaults to [`DEFAULT_CART_KEY`].
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Load the persisted snapshot and create the store.
    pub fn build(self) -> CartStore {
        let cache = Cache::new(self.storage);
        let cart = load_snapshot(&cache, &self.key);
        tracing::debug!(key = %self.key, items = cart.len(), "cart store ready");

        let (state, _) = watch::channel(cart);
        CartStore {
            inner: Arc::new(Inner {
                catalog: self.catalog,
                stock: self.stock,
                cache,
                key: self.key,
                notifier: self.notifier,
                state,
                mutation: Mutex::new(()),
            }),
        }
    }
}

/// Read the snapshot, falling back to an empty cart when it is missing,
/// unreadable or corrupt.
fn load_snapshot(cache: &Cache<Arc<dyn Storage>>, key: &str) -> Cart {
    match cache.get::<Vec<CartItem>>(key) {
        Ok(Some(items)) => Cart::from_items(items),
        Ok(None) => Cart::new(),
        Err(error) => {
            tracing::warn!(%key, %error, "discarding unreadable cart snapshot");
            Cart::new()
        }
    }
}

impl CartStore {
    /// Start building a store from its collaborators.
    pub fn builder(
        catalog: impl CatalogService + 'static,
        stock: impl StockService + 'static,
        storage: impl Storage + 'static,
    ) -> CartStoreBuilder {
        CartStoreBuilder {
            catalog: Arc::new(catalog),
            stock: Arc::new(stock),
            storage: Arc::new(storage),
            notifier: Arc::new(TracingNotifier),
            key: DEFAULT_CART_KEY.to_string(),
        }
    }

    /// Create a store with default notifier and key.
    pub fn load(
        catalog: impl CatalogService + 'static,
        stock: impl StockService + 'static,
        storage: impl Storage + 'static,
    ) -> Self {
        Self::builder(catalog, stock, storage).build()
    }

    /// The current cart.
    pub fn cart(&self) -> Cart {
        self.inner.state.borrow().clone()
    }

    /// Watch the cart. The receiver sees every successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state.subscribe()
    }

    /// Key the snapshot is stored under.
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart goes through
    /// [`update_product_amount`](Self::update_product_amount) with its amount
    /// plus one. A new product is looked up in the catalog and must have
    /// stock left.
    #[tracing::instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) {
        let _guard = self.inner.mutation.lock().await;
        let cart = self.cart();

        if let Some(existing) = cart.get(product_id) {
            let request = UpdateProductAmount::new(product_id, i64::from(existing.amount) + 1);
            let result = self.apply_amount(&cart, request).await;
            self.report(result, Notice::UpdateAmountFailed, Notice::OutOfStockOnUpdate);
            return;
        }

        let result = self.apply_add(&cart, product_id).await;
        self.report(result, Notice::AddProductFailed, Notice::OutOfStockOnAdd);
    }

    /// Remove a product's line from the cart.
    #[tracing::instrument(skip_all, fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) {
        let _guard = self.inner.mutation.lock().await;
        let cart = self.cart();

        let result = match cart.without(product_id) {
            Some(next) => self.commit(next).map(|()| {
                tracing::info!(%product_id, "product removed from cart");
            }),
            None => Err(CartError::ItemNotInCart(product_id)),
        };
        self.report(
            result,
            Notice::RemoveProductFailed,
            Notice::RemoveProductFailed,
        );
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// Zero or negative amounts are ignored without a notice. Amounts above
    /// the current stock are refused.
    #[tracing::instrument(skip_all, fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) {
        let _guard = self.inner.mutation.lock().await;
        let cart = self.cart();

        let result = self.apply_amount(&cart, request).await;
        self.report(result, Notice::UpdateAmountFailed, Notice::OutOfStockOnUpdate);
    }

    async fn apply_add(&self, cart: &Cart, product_id: ProductId) -> Result<(), CartError> {
        let product = self
            .inner
            .catalog
            .product(product_id)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;
        if product.id != product_id {
            return Err(ServiceError::Unexpected(format!(
                "catalog returned product {} for {}",
                product.id, product_id
            ))
            .into());
        }

        let stock = self.fetch_stock(product_id).await?;
        if stock.is_out_of_stock() {
            return Err(CartError::InsufficientStock {
                product_id,
                requested: 1,
                available: stock.amount,
            });
        }

        let next = cart
            .with_added(product)
            .ok_or(CartError::AlreadyInCart(product_id))?;
        self.commit(next)?;
        tracing::info!(%product_id, "product added to cart");
        Ok(())
    }

    async fn apply_amount(
        &self,
        cart: &Cart,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        let stock = self.fetch_stock(product_id).await?;

        if amount <= 0 {
            return Err(CartError::InvalidQuantity(amount));
        }
        let insufficient = CartError::InsufficientStock {
            product_id,
            requested: amount,
            available: stock.amount,
        };
        if !stock.can_fulfill(amount) {
            return Err(insufficient);
        }
        let amount = u32::try_from(amount).map_err(|_| insufficient)?;

        let next = cart
            .with_amount(product_id, amount)
            .ok_or(CartError::ItemNotInCart(product_id))?;
        self.commit(next)?;
        tracing::info!(%product_id, amount, "cart amount updated");
        Ok(())
    }

    async fn fetch_stock(&self, product_id: ProductId) -> Result<StockRecord, CartError> {
        let stock = self.inner.stock.stock(product_id).await?;
        if stock.id != product_id {
            return Err(ServiceError::Unexpected(format!(
                "stock service returned record {} for {}",
                stock.id, product_id
            ))
            .into());
        }
        tracing::debug!(%product_id, available = stock.amount, "stock checked");
        Ok(stock)
    }

    /// Persist `next`, then publish it. Nothing is published if the write
    /// fails.
    fn commit(&self, next: Cart) -> Result<(), CartError> {
        self.inner.cache.set(&self.inner.key, &next)?;
        self.inner.state.send_replace(next);
        Ok(())
    }

    fn report(&self, result: Result<(), CartError>, failed: Notice, out_of_stock: Notice) {
        let Err(error) = result else {
            return;
        };

        let notice = match error.category() {
            ErrorCategory::InvalidQuantity => {
                tracing::debug!(%error, "ignoring non-positive amount");
                return;
            }
            ErrorCategory::OutOfStock => out_of_stock,
            ErrorCategory::NotFound | ErrorCategory::Unexpected => failed,
        };
        tracing::warn!(%error, ?notice, "cart operation failed");
        self.inner.notifier.notify(notice);
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("items", &self.inner.state.borrow().len())
            .finish()
    }
}
