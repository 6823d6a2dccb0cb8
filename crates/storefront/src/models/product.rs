//! Product domain type.

use serde::Serialize;

use minimart_core::{Price, ProductId};

/// A catalog product.
///
/// Products are created out-of-band (admin SQL / seed migration) and are
/// read-only to the storefront.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name (non-empty, enforced by the schema).
    pub name: String,
    /// Current price in minor currency units (non-negative).
    pub price: Price,
}
