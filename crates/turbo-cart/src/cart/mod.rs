//! Shopping cart module.
//!
//! Contains the cart value type, its line items, and update requests.

mod cart;

pub use cart::{Cart, CartItem, UpdateProductAmount};
