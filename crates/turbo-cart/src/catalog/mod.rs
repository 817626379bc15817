//! Product catalog module.
//!
//! Contains the catalog product record, stock records, and the service ports
//! the cart store looks them up through.

mod product;
mod service;
mod stock;

pub use product::Product;
pub use service::{CatalogService, StockService};
pub use stock::StockRecord;
