//! Stock availability records.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Units available for a product at the remote stock service.
///
/// Read-only from the cart's point of view; only ever compared against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockRecord {
    /// Product the record describes.
    pub id: ProductId,
    /// Available units.
    pub amount: i64,
}

impl StockRecord {
    /// Create a stock record.
    pub fn new(id: impl Into<ProductId>, amount: i64) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }

    /// Check if nothing can be sold.
    pub fn is_out_of_stock(&self) -> bool {
        self.amount <= 0
    }

    /// Check if a specific quantity is available.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity <= self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_availability() {
        let stock = StockRecord::new(1u64, 5);
        assert!(!stock.is_out_of_stock());
        assert!(stock.can_fulfill(5));
        assert!(!stock.can_fulfill(6));
    }

    #[test]
    fn test_zero_and_negative_are_out_of_stock() {
        assert!(StockRecord::new(1u64, 0).is_out_of_stock());
        assert!(StockRecord::new(1u64, -3).is_out_of_stock());
    }

    #[test]
    fn test_decodes_wire_shape() {
        let stock: StockRecord = serde_json::from_str(r#"{"id":3,"amount":2}"#).unwrap();
        assert_eq!(stock, StockRecord::new(3u64, 2));
    }
}
