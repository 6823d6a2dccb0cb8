//! Catalog index route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::middleware::auth::ExtractOwner;
use crate::models::Product;
use crate::services::cart::CartService;
use crate::state::AppState;

/// Catalog index data: the full product list plus the visitor's cart total.
#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub products: Vec<Product>,
    pub cart_total: String,
}

/// Display the catalog index.
#[instrument(skip(state, owner))]
pub async fn index(
    State(state): State<AppState>,
    ExtractOwner(owner): ExtractOwner,
) -> Result<Json<CatalogView>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    let cart_total = CartService::new(state.pool()).total_price(&owner).await?;

    Ok(Json(CatalogView {
        products,
        cart_total: cart_total.display(),
    }))
}
