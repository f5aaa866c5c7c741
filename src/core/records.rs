//! Decoding of stored item rows into stock lines.
//!
//! Rows written before a column existed come back with NULL in that column.
//! The decoder fills the documented default instead of requiring a migration.

use crate::entities::item;
use serde::Serialize;

/// Price assumed for rows stored without one
pub const DEFAULT_PRICE: f64 = 0.0;

/// A stored item row with every optional field resolved to its default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLine {
    /// Store-assigned identifier
    pub id: i64,
    /// Product name
    pub name: String,
    /// Units on hand as stored (not clamped)
    pub quantity: i64,
    /// Unit price, `DEFAULT_PRICE` when the row has none
    pub price: f64,
    /// Category reference, if any
    pub category_id: Option<i64>,
    /// Supplier reference, if any
    pub supplier_id: Option<i64>,
}

impl StockLine {
    /// Value of this line at its own price.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

impl From<item::Model> for StockLine {
    fn from(model: item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            quantity: model.quantity,
            price: model.price.unwrap_or(DEFAULT_PRICE),
            category_id: model.category_id,
            supplier_id: model.supplier_id,
        }
    }
}
