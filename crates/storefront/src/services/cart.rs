//! Cart service: one contract over two cart backends.
//!
//! Authenticated carts live in `cart_items` rows and see live catalog prices;
//! anonymous carts live in a [`SessionCart`] value object and see prices
//! snapshotted at add time. The divergence is intentional and preserved here.
//!
//! Every operation dispatches once on the [`CartOwner`] variant. Anonymous
//! mutations update the embedded `SessionCart` in place; the route layer is
//! responsible for writing the updated value back into the session store.

use sqlx::PgPool;
use thiserror::Error;

use minimart_core::{Price, ProductId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::{CartLine, CurrentUser, SessionCart};

/// The label recorded on purchases made from an anonymous cart.
pub const ANONYMOUS_PERSON: &str = "Anonymous";

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The referenced product does not exist in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The product already has a line in this cart; nothing was changed.
    #[error("product {0} is already in the cart")]
    AlreadyInCart(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Who owns the active cart for this request.
///
/// Either an authenticated user (database-backed cart) or an anonymous
/// visitor carrying their cart as a session value.
#[derive(Debug, Clone)]
pub enum CartOwner {
    /// Authenticated identity; lines live in the `cart_items` table.
    User(CurrentUser),
    /// Anonymous session; lines live in the embedded value object.
    Anonymous(SessionCart),
}

impl CartOwner {
    /// The purchaser label used on checkout: the username, or "Anonymous".
    #[must_use]
    pub fn person_label(&self) -> &str {
        match self {
            Self::User(user) => &user.username,
            Self::Anonymous(_) => ANONYMOUS_PERSON,
        }
    }

    /// The session cart to persist back into the session, if any.
    #[must_use]
    pub const fn session_cart(&self) -> Option<&SessionCart> {
        match self {
            Self::User(_) => None,
            Self::Anonymous(cart) => Some(cart),
        }
    }
}

/// Uniform cart operations over either backend.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a line with quantity 1 for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product does not exist.
    /// Returns `CartError::AlreadyInCart` if a line for this product already
    /// exists; the cart is left untouched (re-adding never bumps quantity).
    pub async fn add_line(
        &self,
        owner: &mut CartOwner,
        product_id: ProductId,
    ) -> Result<(), CartError> {
        let product = ProductRepository::new(self.pool)
            .get(product_id)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;

        let inserted = match owner {
            CartOwner::User(user) => {
                CartRepository::new(self.pool)
                    .add(user.id, product.id)
                    .await?
            }
            CartOwner::Anonymous(cart) => cart.insert_snapshot(&product),
        };

        if inserted {
            Ok(())
        } else {
            Err(CartError::AlreadyInCart(product_id))
        }
    }

    /// Remove the line for `product_id` if present. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a database query fails.
    pub async fn remove_line(
        &self,
        owner: &mut CartOwner,
        product_id: ProductId,
    ) -> Result<(), CartError> {
        match owner {
            CartOwner::User(user) => {
                CartRepository::new(self.pool)
                    .remove(user.id, product_id)
                    .await?;
            }
            CartOwner::Anonymous(cart) => {
                cart.remove(product_id);
            }
        }

        Ok(())
    }

    /// List the cart's lines as uniform views.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a database query fails.
    pub async fn lines(&self, owner: &CartOwner) -> Result<Vec<CartLine>, CartError> {
        match owner {
            CartOwner::User(user) => Ok(CartRepository::new(self.pool).lines(user.id).await?),
            CartOwner::Anonymous(cart) => Ok(cart.lines()),
        }
    }

    /// Sum of line totals; zero for an empty or nonexistent cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a database query fails.
    pub async fn total_price(&self, owner: &CartOwner) -> Result<Price, CartError> {
        match owner {
            CartOwner::User(user) => {
                Ok(CartRepository::new(self.pool).total_price(user.id).await?)
            }
            CartOwner::Anonymous(cart) => Ok(cart.total_price()),
        }
    }

    /// Remove all lines for the owner. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a database query fails.
    pub async fn clear(&self, owner: &mut CartOwner) -> Result<(), CartError> {
        match owner {
            CartOwner::User(user) => {
                CartRepository::new(self.pool).clear(user.id).await?;
            }
            CartOwner::Anonymous(cart) => cart.clear(),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimart_core::UserId;

    #[test]
    fn test_person_label() {
        let user = CartOwner::User(CurrentUser {
            id: UserId::new(1),
            username: "alice".to_string(),
        });
        assert_eq!(user.person_label(), "alice");

        let anon = CartOwner::Anonymous(SessionCart::default());
        assert_eq!(anon.person_label(), "Anonymous");
    }

    #[test]
    fn test_session_cart_accessor() {
        let anon = CartOwner::Anonymous(SessionCart::default());
        assert!(anon.session_cart().is_some());

        let user = CartOwner::User(CurrentUser {
            id: UserId::new(1),
            username: "alice".to_string(),
        });
        assert!(user.session_cart().is_none());
    }

    #[test]
    fn test_cart_error_display() {
        let err = CartError::ProductNotFound(ProductId::new(9));
        assert_eq!(err.to_string(), "product 9 not found");

        let err = CartError::AlreadyInCart(ProductId::new(2));
        assert_eq!(err.to_string(), "product 2 is already in the cart");
    }
}
