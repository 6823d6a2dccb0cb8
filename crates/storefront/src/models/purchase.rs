//! Purchase domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use minimart_core::{ProductId, PurchaseId};

/// A completed purchase record.
///
/// Created only by the checkout flow, one row per cart line. Append-only:
/// the storefront never updates or deletes purchases.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Purchase {
    /// Unique purchase ID.
    pub id: PurchaseId,
    /// Product that was purchased.
    pub product_id: ProductId,
    /// Purchaser label: the username, or "Anonymous" for session carts.
    pub person: String,
    /// Shipping address as entered at checkout.
    pub address: String,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}
