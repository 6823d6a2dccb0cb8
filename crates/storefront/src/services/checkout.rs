//! Checkout orchestrator.
//!
//! Converts the active cart into purchase records and empties the cart as a
//! single logical unit. Everything happens inside one explicit sqlx
//! transaction: a persistent cart is consumed with `DELETE ... RETURNING`, so
//! the rows this checkout charges for are exactly the rows it removed — two
//! racing checkouts for one user cannot both see the same lines, the loser
//! deletes nothing and fails with `EmptyCart`. If any insert fails, the
//! transaction is dropped and rolled back, leaving both the ledger and the
//! cart exactly as they were.
//!
//! Anonymous carts are cleared in the session value only after the commit
//! succeeds, so a failed checkout leaves the session cart intact.

use sqlx::PgPool;
use thiserror::Error;

use minimart_core::ProductId;

use crate::services::cart::CartOwner;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines; nothing was written.
    #[error("cart is empty")]
    EmptyCart,

    /// A product referenced by a cart line no longer exists in the catalog.
    /// The whole checkout was rolled back.
    #[error("product {0} is no longer available")]
    ProductVanished(ProductId),

    /// Database error during the checkout transaction.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Orchestrates the cart-to-purchases transaction.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Check out the owner's cart to `address`.
    ///
    /// Creates one purchase row per cart line and clears the cart. Note that
    /// line quantity is tracked in the cart but deliberately not expanded
    /// into multiple purchase rows nor recorded on the purchase; a line with
    /// quantity 3 still produces exactly one purchase row.
    ///
    /// Returns the number of purchase rows created.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::ProductVanished` if a referenced product no
    /// longer exists; no partial writes survive.
    pub async fn checkout(
        &self,
        owner: &mut CartOwner,
        address: &str,
    ) -> Result<usize, CheckoutError> {
        let person = owner.person_label().to_owned();

        let mut tx = self.pool.begin().await?;

        // The delete is the read: the returned rows are the only lines this
        // checkout may charge for. A concurrent checkout for the same user
        // blocks on the row locks and then deletes nothing.
        let product_ids: Vec<ProductId> = match &*owner {
            CartOwner::User(user) => {
                sqlx::query_scalar(
                    "DELETE FROM cart_items WHERE user_id = $1 RETURNING product_id",
                )
                .bind(user.id)
                .fetch_all(&mut *tx)
                .await?
            }
            CartOwner::Anonymous(cart) => cart.lines().iter().map(|l| l.product_id).collect(),
        };

        if product_ids.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        for &product_id in &product_ids {
            sqlx::query("INSERT INTO purchases (product_id, person, address) VALUES ($1, $2, $3)")
                .bind(product_id)
                .bind(&person)
                .bind(address)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    // A session snapshot can outlive its product; the foreign
                    // key catches that at insert time.
                    if let sqlx::Error::Database(ref db_err) = e
                        && db_err.is_foreign_key_violation()
                    {
                        return CheckoutError::ProductVanished(product_id);
                    }
                    CheckoutError::Database(e)
                })?;
        }

        tx.commit().await?;

        if let CartOwner::Anonymous(cart) = owner {
            cart.clear();
        }

        tracing::info!(person = %person, count = product_ids.len(), "checkout completed");

        Ok(product_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_error_display() {
        assert_eq!(CheckoutError::EmptyCart.to_string(), "cart is empty");
        assert_eq!(
            CheckoutError::ProductVanished(ProductId::new(4)).to_string(),
            "product 4 is no longer available"
        );
    }
}
