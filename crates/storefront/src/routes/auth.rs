//! Authentication route handlers.
//!
//! Registration and login store a [`CurrentUser`] in the session; the cart
//! extractor then resolves that identity to the persistent cart backend.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::{CurrentUser, session_keys};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration and login form data.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// Store the logged-in user in the session, cycling the session ID.
async fn establish_session(session: &Session, user: CurrentUser) -> Result<()> {
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("failed to cycle session: {e}")))?;
    session
        .insert(session_keys::CURRENT_USER, &user)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store session user: {e}")))?;
    Ok(())
}

/// Login prompt target for unauthenticated redirects.
///
/// Rendering is out of scope; this just gives `RequireAuth`'s redirect a
/// place to land.
pub async fn login_page() -> &'static str {
    "Log in by POSTing username and password to /auth/login"
}

/// Register a new user and log them in.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    let user = AuthService::new(state.pool())
        .register(&form.username, &form.password)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    establish_session(
        &session,
        CurrentUser {
            id: user.id,
            username: user.username,
        },
    )
    .await?;

    Ok(Redirect::to("/").into_response())
}

/// Log in an existing user.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    let user = AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await?;

    establish_session(
        &session,
        CurrentUser {
            id: user.id,
            username: user.username,
        },
    )
    .await?;

    Ok(Redirect::to("/").into_response())
}

/// Log out: drop the whole session, including any anonymous cart.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Redirect::to("/").into_response())
}
