//! Session-stored types.
//!
//! The anonymous cart lives entirely inside the session as a serializable
//! value object. Handlers receive it by value, mutate it, and write the
//! updated value back into the session store; there is no ambient mutable
//! session state anywhere else in the crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use minimart_core::{Price, ProductId, UserId};

use crate::models::cart::CartLine;
use crate::models::product::Product;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's login name.
    pub username: String,
}

/// One line of an anonymous session cart.
///
/// Name and price are snapshotted at add time: the session has no durable
/// product reference, so the snapshot is what checkout and totals see even
/// if the catalog price changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLine {
    /// Product name at add time.
    pub name: String,
    /// Product price at add time, in minor currency units.
    pub price: Price,
    /// Number of units (positive).
    pub quantity: u32,
}

/// An anonymous visitor's cart, keyed by decimal product-id strings.
///
/// A `BTreeMap` keeps iteration order stable across reads within a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCart {
    lines: BTreeMap<String, SessionLine>,
}

impl SessionCart {
    /// Add a snapshot line for `product` with quantity 1.
    ///
    /// Returns `false` without touching the cart if a line for this product
    /// already exists (duplicate adds never bump quantity).
    pub fn insert_snapshot(&mut self, product: &Product) -> bool {
        let key = product.id.to_string();
        if self.lines.contains_key(&key) {
            return false;
        }
        self.lines.insert(
            key,
            SessionLine {
                name: product.name.clone(),
                price: product.price,
                quantity: 1,
            },
        );
        true
    }

    /// Remove the line for `product_id` if present. Idempotent.
    ///
    /// Returns `true` if a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        self.lines.remove(&product_id.to_string()).is_some()
    }

    /// Remove all lines. Idempotent.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Uniform line views over the snapshot data, in stable key order.
    ///
    /// Entries whose key does not parse as a product ID are skipped; they can
    /// only appear if the session payload was corrupted externally.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lines
            .iter()
            .filter_map(|(key, line)| {
                let product_id = key.parse::<i32>().ok().map(ProductId::new)?;
                Some(CartLine {
                    product_id,
                    name: line.name.clone(),
                    unit_price: line.price,
                    quantity: line.quantity,
                })
            })
            .collect()
    }

    /// Sum of all line totals using the snapshotted prices.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines
            .values()
            .map(|line| line.price.times(line.quantity))
            .sum()
    }
}

/// Session keys for storefront data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the anonymous session cart.
    pub const CART: &str = "cart";
}
