//! Key-value storage for TurboCart.
//!
//! Mirrors the browser `localStorage` model: string values under string keys,
//! surviving restarts when backed by a file. [`Cache`] layers automatic JSON
//! serialization on top of any [`Storage`] backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cache::{Cache, FileStorage};
//!
//! let cache = Cache::new(FileStorage::open(".cart/storage.json")?);
//!
//! // Store a value
//! cache.set("turbo-cart:cart", &cart)?;
//!
//! // Retrieve a value
//! let cart: Option<Vec<CartItem>> = cache.get("turbo-cart:cart")?;
//!
//! // Delete a value
//! cache.delete("turbo-cart:cart")?;
//! ```

mod error;
mod kv;
mod storage;

pub use error::CacheError;
pub use kv::Cache;
pub use storage::{FileStorage, MemoryStorage, Storage};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStorage, MemoryStorage, Storage};
}
