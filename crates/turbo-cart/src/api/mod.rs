//! Catalog and stock service adapters.
//!
//! - [`StorefrontApi`]: REST storefront API over HTTP
//! - [`InMemoryStorefront`]: process-local catalog for development and tests

mod http;
mod memory;

pub use http::StorefrontApi;
pub use memory::InMemoryStorefront;
