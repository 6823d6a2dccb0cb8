//! Cart line view type.

use serde::Serialize;

use minimart_core::{Price, ProductId};

/// A uniform view of one cart line, regardless of backend.
///
/// For database-backed carts `unit_price` is the product's live price; for
/// session-backed carts it is the price snapshotted when the line was added.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    /// Product this line references.
    pub product_id: ProductId,
    /// Display name of the product.
    pub name: String,
    /// Unit price (live or snapshot, depending on backend).
    pub unit_price: Price,
    /// Number of units (positive).
    pub quantity: u32,
}

impl CartLine {
    /// The line total: `quantity * unit_price`.
    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}
