//! Business logic services for storefront.

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::AuthService;
pub use cart::{CartError, CartOwner, CartService};
pub use checkout::{CheckoutError, CheckoutService};
