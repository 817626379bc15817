//! Cart error types.

use crate::ids::ProductId;
use thiserror::Error;

/// Errors raised by the remote catalog and stock services.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// HTTP transport or decoding failure.
    #[error("Fetch error: {0}")]
    Fetch(#[from] turbo_data::FetchError),

    /// The service answered, but not with something usable.
    #[error("Unexpected response: {0}")]
    Unexpected(String),

    /// The service could not be reached at all.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// How a failure is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Product missing from the catalog or from the cart.
    NotFound,
    /// Requested quantity exceeds available stock.
    OutOfStock,
    /// Requested quantity is zero or negative. Handled silently.
    InvalidQuantity,
    /// Anything else: network, decoding, storage.
    Unexpected,
}

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(ProductId),

    /// Insufficient stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A new line was requested for a product that already has one.
    #[error("Product already in cart: {0}")]
    AlreadyInCart(ProductId),

    /// Remote lookup failed.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Snapshot storage failed.
    #[error("Cache error: {0}")]
    Cache(#[from] turbo_cache::CacheError),
}

impl CartError {
    /// Classify the error by its user-visible behavior.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::ProductNotFound(_) | CartError::ItemNotInCart(_) => ErrorCategory::NotFound,
            CartError::InsufficientStock { .. } => ErrorCategory::OutOfStock,
            CartError::InvalidQuantity(_) => ErrorCategory::InvalidQuantity,
            CartError::AlreadyInCart(_) | CartError::Service(_) | CartError::Cache(_) => {
                ErrorCategory::Unexpected
            }
        }
    }
}
