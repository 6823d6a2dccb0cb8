//! HTTP route handlers for storefront.
//!
//! Presentation is out of scope here: handlers return JSON views and
//! redirects, leaving rendering to whatever front-end consumes them.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog index (products + cart total)
//! GET  /health                 - Health check
//!
//! # Cart
//! GET  /cart                   - Cart view
//! POST /cart/add               - Add product to cart, redirect to /
//! POST /cart/remove            - Remove product, redirect to /cart
//! POST /cart/clear             - Clear cart, redirect to /cart
//!
//! # Checkout
//! POST /checkout               - Create purchases from the cart, redirect to /
//!
//! # Auth
//! POST /auth/register          - Register and log in
//! GET  /auth/login             - Login prompt (redirect target)
//! POST /auth/login             - Login action
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account/purchases      - Purchase history, newest first
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/purchases", get(account::purchases))
}

/// Create the complete storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/checkout", post(checkout::checkout))
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
}
