//! Domain models for storefront.

pub mod cart;
pub mod product;
pub mod purchase;
pub mod session;
pub mod user;

pub use cart::CartLine;
pub use product::Product;
pub use purchase::Purchase;
pub use session::{CurrentUser, SessionCart, keys as session_keys};
pub use user::User;
