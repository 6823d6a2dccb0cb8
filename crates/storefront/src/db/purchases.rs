//! Purchase ledger repository.
//!
//! The ledger is append-only: inserts happen only inside the checkout
//! transaction (see `services::checkout`), and nothing in the storefront
//! updates or deletes a purchase once written.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Purchase;

/// Repository for reading the purchase ledger.
pub struct PurchaseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PurchaseRepository<'a> {
    /// Create a new purchase repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all purchases made under `person`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_person(&self, person: &str) -> Result<Vec<Purchase>, RepositoryError> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r"
            SELECT id, product_id, person, address, created_at
            FROM purchases
            WHERE person = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(person)
        .fetch_all(self.pool)
        .await?;

        Ok(purchases)
    }
}
