//! Leptos context integration.
//!
//! Provide one [`CartStore`] near the root of the component tree and read it
//! from any descendant.

use leptos::prelude::{provide_context, use_context};

use crate::store::CartStore;

/// Make `store` available to the current component and its children.
pub fn provide_cart_store(store: CartStore) {
    provide_context(store);
}

/// The store provided by an ancestor, if any.
pub fn use_cart_store() -> Option<CartStore> {
    use_context::<CartStore>()
}
