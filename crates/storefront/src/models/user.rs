//! User account type.

use chrono::{DateTime, Utc};

use minimart_core::UserId;

/// A registered user, decoded straight from its `users` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name, also used as the purchaser label at checkout.
    pub username: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
