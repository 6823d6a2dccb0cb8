//! Cart route handlers.
//!
//! Mutating handlers follow the post/redirect pattern: add redirects back to
//! the catalog index, remove and clear redirect to the cart view. A duplicate
//! add is treated as success with a notice logged; the cart is unchanged.

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use minimart_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::auth::{ExtractOwner, save_owner};
use crate::models::CartLine;
use crate::services::cart::{CartError, CartService};
use crate::state::AppState;

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_price: String,
    pub item_count: usize,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            unit_price: line.unit_price.display(),
            quantity: line.quantity,
            line_total: line.line_total().display(),
        }
    }
}

impl CartView {
    fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            items: lines.iter().map(CartItemView::from).collect(),
            total_price: lines
                .iter()
                .map(CartLine::line_total)
                .sum::<minimart_core::Price>()
                .display(),
            item_count: lines.len(),
        }
    }
}

/// Add/remove form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: ProductId,
}

/// Display the cart.
#[instrument(skip(state, owner))]
pub async fn show(
    State(state): State<AppState>,
    ExtractOwner(owner): ExtractOwner,
) -> Result<Json<CartView>> {
    let lines = CartService::new(state.pool()).lines(&owner).await?;
    Ok(Json(CartView::from_lines(&lines)))
}

/// Add a product to the cart, then redirect to the catalog index.
///
/// Re-adding a product already in the cart changes nothing; the request
/// still redirects like a successful add.
#[instrument(skip(state, session, owner))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    ExtractOwner(mut owner): ExtractOwner,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    match CartService::new(state.pool())
        .add_line(&mut owner, form.product_id)
        .await
    {
        Ok(()) => {}
        Err(CartError::AlreadyInCart(product_id)) => {
            tracing::debug!(%product_id, "product already in cart, nothing added");
        }
        Err(e) => return Err(AppError::from(e)),
    }

    save_owner(&session, &owner)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save session cart: {e}")))?;

    Ok(Redirect::to("/").into_response())
}

/// Remove a product from the cart, then redirect to the cart view.
#[instrument(skip(state, session, owner))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    ExtractOwner(mut owner): ExtractOwner,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    CartService::new(state.pool())
        .remove_line(&mut owner, form.product_id)
        .await?;

    save_owner(&session, &owner)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save session cart: {e}")))?;

    Ok(Redirect::to("/cart").into_response())
}

/// Clear the cart, then redirect to the cart view.
#[instrument(skip(state, session, owner))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    ExtractOwner(mut owner): ExtractOwner,
) -> Result<Response> {
    CartService::new(state.pool()).clear(&mut owner).await?;

    save_owner(&session, &owner)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save session cart: {e}")))?;

    Ok(Redirect::to("/cart").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimart_core::Price;

    fn lines() -> Vec<CartLine> {
        vec![
            CartLine {
                product_id: ProductId::new(1),
                name: "Product A".to_string(),
                unit_price: Price::from_minor_units(100),
                quantity: 1,
            },
            CartLine {
                product_id: ProductId::new(2),
                name: "Product B".to_string(),
                unit_price: Price::from_minor_units(200),
                quantity: 1,
            },
        ]
    }

    #[test]
    fn test_cart_view_totals() {
        let view = CartView::from_lines(&lines());
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total_price, "$3.00");
    }

    #[test]
    fn test_cart_item_view_formatting() {
        let line = CartLine {
            product_id: ProductId::new(7),
            name: "Widget".to_string(),
            unit_price: Price::from_minor_units(150),
            quantity: 2,
        };
        let view = CartItemView::from(&line);
        assert_eq!(view.unit_price, "$1.50");
        assert_eq!(view.line_total, "$3.00");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from_lines(&[]);
        assert_eq!(view.item_count, 0);
        assert_eq!(view.total_price, "$0.00");
        assert!(view.items.is_empty());
    }
}
