//! Checkout route handler.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::auth::{ExtractOwner, save_owner};
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub address: String,
}

/// Check out the active cart to the given shipping address.
///
/// On success the cart is empty and the visitor is redirected to the catalog
/// index. Failures (empty cart, vanished product) leave the cart and the
/// purchase ledger untouched.
#[instrument(skip(state, session, owner, form))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    ExtractOwner(mut owner): ExtractOwner,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let address = form.address.trim();
    if address.is_empty() {
        return Err(AppError::BadRequest(
            "shipping address must not be empty".to_string(),
        ));
    }

    let created = CheckoutService::new(state.pool())
        .checkout(&mut owner, address)
        .await?;

    save_owner(&session, &owner)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save session cart: {e}")))?;

    tracing::info!(purchases = created, "checkout succeeded");

    Ok(Redirect::to("/").into_response())
}
