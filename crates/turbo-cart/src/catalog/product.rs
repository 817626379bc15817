//! Catalog product record.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product as returned by the catalog service.
///
/// Only the id is interpreted. Every other field (title, price, image, ...)
/// is kept verbatim in `details` and passed through to the cart and its
/// snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display and pricing fields, opaque to the cart.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Product {
    /// Create a product with no display fields.
    pub fn new(id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            details: Map::new(),
        }
    }

    /// Add a display field.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Look up a display field.
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    /// The `title` field, when present and textual.
    pub fn title(&self) -> Option<&str> {
        self.detail("title").and_then(Value::as_str)
    }

    /// The `price` field, when present and numeric.
    pub fn price(&self) -> Option<f64> {
        self.detail("price").and_then(Value::as_f64)
    }
}
