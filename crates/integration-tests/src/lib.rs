//! Shared helpers for Minimart integration tests.
//!
//! These tests require a running `PostgreSQL` instance reachable via
//! `MINIMART_DATABASE_URL` (or `DATABASE_URL`). Tests are marked `#[ignore]`
//! so a plain `cargo test` passes without infrastructure; run them with
//! `cargo test -p minimart-integration-tests -- --ignored`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use secrecy::SecretString;
use sqlx::PgPool;

use minimart_core::{Price, ProductId, UserId};
use minimart_storefront::db;

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Connect to the test database and run migrations.
///
/// # Panics
///
/// Panics if the database URL is missing or the connection fails; these
/// tests only run when infrastructure is explicitly provided.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("MINIMART_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("MINIMART_DATABASE_URL or DATABASE_URL must be set for integration tests");

    let pool = db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../storefront/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Generate a unique name so concurrent test runs don't collide.
#[must_use]
pub fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{n}")
}

/// Insert a catalog product and return its ID.
pub async fn create_product(pool: &PgPool, name: &str, price: Price) -> ProductId {
    sqlx::query_scalar::<_, ProductId>(
        "INSERT INTO products (name, price) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(price)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test product")
}

/// Delete a catalog product (cascades to cart lines and purchases).
pub async fn delete_product(pool: &PgPool, id: ProductId) {
    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("Failed to delete test product");
}

/// Insert a user row and return its ID.
pub async fn create_user(pool: &PgPool, username: &str) -> UserId {
    sqlx::query_scalar::<_, UserId>("INSERT INTO users (username) VALUES ($1) RETURNING id")
        .bind(username)
        .fetch_one(pool)
        .await
        .expect("Failed to insert test user")
}

/// Count ledger rows for a purchaser label.
pub async fn count_purchases(pool: &PgPool, person: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchases WHERE person = $1")
        .bind(person)
        .fetch_one(pool)
        .await
        .expect("Failed to count purchases")
}
