//! Middleware for the storefront.

pub mod auth;
pub mod session;

pub use auth::{ExtractOwner, RequireAuth, save_owner};
pub use session::{create_session_layer, create_session_store};
