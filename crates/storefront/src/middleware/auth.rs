//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring authentication in route handlers, and
//! the [`ExtractOwner`] extractor that resolves the active cart owner for a
//! request: the logged-in user, or an anonymous session cart.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, SessionCart, session_keys};
use crate::services::cart::CartOwner;

/// Extractor that requires an authenticated user.
///
/// If the user is not logged in, returns a redirect to the login page
/// (or 401 for API paths).
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if parts.uri.path().starts_with("/api/") {
                    AuthRejection::Unauthorized
                } else {
                    AuthRejection::RedirectToLogin
                }
            })?;

        Ok(Self(user))
    }
}

/// Extractor resolving the cart owner for this request.
///
/// Dispatches once on identity state: a logged-in user gets the persistent
/// cart backend, everyone else gets the session cart value (defaulting to an
/// empty cart on first touch). Handlers that mutate an anonymous owner must
/// persist the updated value back with [`save_owner`].
pub struct ExtractOwner(pub CartOwner);

/// Error returned when the session layer is missing or unreadable.
pub struct OwnerRejection;

impl IntoResponse for OwnerRejection {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

impl<S> FromRequestParts<S> for ExtractOwner
where
    S: Send + Sync,
{
    type Rejection = OwnerRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or(OwnerRejection)?;

        if let Ok(Some(user)) = session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
            return Ok(Self(CartOwner::User(user)));
        }

        let cart = session
            .get::<SessionCart>(session_keys::CART)
            .await
            .map_err(|_| OwnerRejection)?
            .unwrap_or_default();

        Ok(Self(CartOwner::Anonymous(cart)))
    }
}

/// Persist a (possibly mutated) anonymous cart back into the session.
///
/// No-op for authenticated owners, whose cart lives in the database.
///
/// # Errors
///
/// Returns the session store error if the write fails.
pub async fn save_owner(
    session: &Session,
    owner: &CartOwner,
) -> Result<(), tower_sessions::session::Error> {
    if let Some(cart) = owner.session_cart() {
        session.insert(session_keys::CART, cart).await?;
    }
    Ok(())
}
