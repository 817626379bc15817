//! Shopping cart store for TurboCart storefronts.
//!
//! This crate keeps a client-side shopping cart in sync with a remote
//! catalog and stock service:
//!
//! - **Cart**: line items keyed by product id, with quantities
//! - **Catalog**: product records and stock levels, looked up through service ports
//! - **Store**: serialized add/remove/update operations with local persistence
//! - **Notify**: user-facing notices for failed operations
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_cart::prelude::*;
//! use turbo_cache::FileStorage;
//!
//! let config = CartConfig::load("cart.toml")?;
//! let api = Arc::new(StorefrontApi::from_config(&config.api)?);
//! let storage = FileStorage::open(&config.storage.path)?;
//!
//! let store = CartStore::builder(api.clone(), api, storage)
//!     .key(config.storage.key)
//!     .build();
//!
//! store.add_product(ProductId::new(1)).await;
//! store
//!     .update_product_amount(UpdateProductAmount::new(1u64, 3))
//!     .await;
//!
//! println!("{} units", store.cart().total_units());
//! ```

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod notify;
pub mod store;

#[cfg(feature = "leptos")]
pub mod context;

pub use error::{CartError, ErrorCategory, ServiceError};
pub use ids::ProductId;
pub use store::{CartStore, CartStoreBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CartError, ErrorCategory, ServiceError};
    pub use crate::ids::ProductId;

    // Adapters
    pub use crate::api::{InMemoryStorefront, StorefrontApi};

    // Cart
    pub use crate::cart::{Cart, CartItem, UpdateProductAmount};

    // Catalog
    pub use crate::catalog::{CatalogService, Product, StockRecord, StockService};

    // Config
    pub use crate::config::{ApiConfig, CartConfig, StorageConfig, DEFAULT_CART_KEY};

    // Notifications
    pub use crate::notify::{
        ChannelNotifier, Notice, Notifier, RecordingNotifier, TracingNotifier,
    };

    // Store
    pub use crate::store::{CartStore, CartStoreBuilder};

    #[cfg(feature = "leptos")]
    pub use crate::context::{provide_cart_store, use_cart_store};
}
