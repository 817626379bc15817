//! Cart and line item types.
//!
//! A [`Cart`] is an immutable-style value: every edit returns a new cart so
//! the store can persist the candidate before publishing it.

use std::collections::BTreeMap;

use crate::catalog::Product;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A product in the cart together with the quantity requested.
///
/// Serializes flat: the product's fields followed by `amount`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// The catalog record, passed through unchanged.
    #[serde(flatten)]
    pub product: Product,
    /// Quantity. Always >= 1 once in a cart.
    pub amount: u32,
}

impl CartItem {
    /// Create a line item from a catalog record.
    ///
    /// A stray `amount` field in the catalog record is dropped so it cannot
    /// collide with the quantity.
    pub fn new(mut product: Product, amount: u32) -> Self {
        product.details.remove("amount");
        Self { product, amount }
    }

    /// Product id of the line.
    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

/// Parameters for changing the quantity of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    /// Line to change.
    pub product_id: ProductId,
    /// Requested quantity. Zero or negative requests are ignored.
    pub amount: i64,
}

impl UpdateProductAmount {
    /// Create an update request.
    pub fn new(product_id: impl Into<ProductId>, amount: i64) -> Self {
        Self {
            product_id: product_id.into(),
            amount,
        }
    }
}

/// A shopping cart: ordered line items, unique by product id.
///
/// Serializes as a bare JSON array of items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from items, keeping the first line for any repeated id
    /// and dropping lines with a zero amount.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.amount >= 1 && !cart.contains(item.id()) {
                cart.items.push(item);
            }
        }
        cart
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over items.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Get an item by product ID.
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    /// Check whether a product is in the cart.
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count (sum of amounts).
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.amount)).sum()
    }

    /// Quantity per product, as shown next to "add to cart" buttons.
    pub fn amount_by_product(&self) -> BTreeMap<ProductId, u32> {
        self.items.iter().map(|i| (i.id(), i.amount)).collect()
    }

    /// A copy of this cart with `product` appended at quantity 1.
    ///
    /// Returns `None` if the product is already present.
    pub fn with_added(&self, product: Product) -> Option<Cart> {
        if self.contains(product.id) {
            return None;
        }
        let mut items = self.items.clone();
        items.push(CartItem::new(product, 1));
        Some(Cart { items })
    }

    /// A copy of this cart without the given product.
    ///
    /// Returns `None` if the product is not present.
    pub fn without(&self, id: ProductId) -> Option<Cart> {
        if !self.contains(id) {
            return None;
        }
        let items = self.items.iter().filter(|i| i.id() != id).cloned().collect();
        Some(Cart { items })
    }

    /// A copy of this cart with one line's amount replaced.
    ///
    /// Returns `None` if the product is not present or `amount` is zero.
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Cart> {
        if amount == 0 || !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .map(|i| {
                if i.id() == id {
                    CartItem {
                        amount,
                        ..i.clone()
                    }
                } else {
                    i.clone()
                }
            })
            .collect();
        Some(Cart { items })
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
