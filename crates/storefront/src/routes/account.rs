//! Account route handlers.
//!
//! These routes require authentication.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use minimart_core::{ProductId, PurchaseId};

use crate::db::PurchaseRepository;
use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::models::Purchase;
use crate::state::AppState;

/// Purchase display data.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseView {
    pub id: PurchaseId,
    pub product_id: ProductId,
    pub address: String,
    pub created_at: String,
}

impl From<&Purchase> for PurchaseView {
    fn from(purchase: &Purchase) -> Self {
        Self {
            id: purchase.id,
            product_id: purchase.product_id,
            address: purchase.address.clone(),
            created_at: purchase.created_at.to_rfc3339(),
        }
    }
}

/// Display the logged-in user's purchase history, most recent first.
#[instrument(skip(state, current_user))]
pub async fn purchases(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
) -> Result<Json<Vec<PurchaseView>>> {
    let purchases = PurchaseRepository::new(state.pool())
        .list_by_person(&current_user.username)
        .await?;

    Ok(Json(purchases.iter().map(PurchaseView::from).collect()))
}
