//! Integration tests for the persistent (database-backed) cart.
//!
//! Require `PostgreSQL`; see crate docs. Run with `-- --ignored`.

use minimart_core::{Price, ProductId};
use minimart_integration_tests::{create_product, create_user, test_pool, unique};
use minimart_storefront::models::CurrentUser;
use minimart_storefront::services::cart::{CartError, CartOwner, CartService};

async fn user_owner(pool: &sqlx::PgPool) -> CartOwner {
    let username = unique("cart-user");
    let id = create_user(pool, &username).await;
    CartOwner::User(CurrentUser { id, username })
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn add_then_total_equals_price() {
    let pool = test_pool().await;
    let service = CartService::new(&pool);
    let mut owner = user_owner(&pool).await;

    let product = create_product(&pool, &unique("p"), Price::from_minor_units(100)).await;
    service.add_line(&mut owner, product).await.expect("add");

    let total = service.total_price(&owner).await.expect("total");
    assert_eq!(total, Price::from_minor_units(100));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn duplicate_add_signals_already_in_cart() {
    let pool = test_pool().await;
    let service = CartService::new(&pool);
    let mut owner = user_owner(&pool).await;

    let product = create_product(&pool, &unique("p"), Price::from_minor_units(100)).await;
    service.add_line(&mut owner, product).await.expect("add");

    let err = service
        .add_line(&mut owner, product)
        .await
        .expect_err("second add must be rejected");
    assert!(matches!(err, CartError::AlreadyInCart(id) if id == product));

    let lines = service.lines(&owner).await.expect("lines");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines.first().map(|l| l.quantity), Some(1));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn add_unknown_product_is_not_found() {
    let pool = test_pool().await;
    let service = CartService::new(&pool);
    let mut owner = user_owner(&pool).await;

    let err = service
        .add_line(&mut owner, ProductId::new(i32::MAX))
        .await
        .expect_err("unknown product must be rejected");
    assert!(matches!(err, CartError::ProductNotFound(_)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn remove_absent_line_is_a_noop() {
    let pool = test_pool().await;
    let service = CartService::new(&pool);
    let mut owner = user_owner(&pool).await;

    let product = create_product(&pool, &unique("p"), Price::from_minor_units(100)).await;

    service
        .remove_line(&mut owner, product)
        .await
        .expect("removing an absent line must succeed");
    assert_eq!(
        service.total_price(&owner).await.expect("total"),
        Price::ZERO
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn persistent_lines_use_live_price() {
    let pool = test_pool().await;
    let service = CartService::new(&pool);
    let mut owner = user_owner(&pool).await;

    let product = create_product(&pool, &unique("p"), Price::from_minor_units(100)).await;
    service.add_line(&mut owner, product).await.expect("add");

    // Reprice after the line was added; the database-backed cart follows.
    sqlx::query("UPDATE products SET price = $1 WHERE id = $2")
        .bind(Price::from_minor_units(250))
        .bind(product)
        .execute(&pool)
        .await
        .expect("reprice");

    let total = service.total_price(&owner).await.expect("total");
    assert_eq!(total, Price::from_minor_units(250));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn clear_empties_cart_idempotently() {
    let pool = test_pool().await;
    let service = CartService::new(&pool);
    let mut owner = user_owner(&pool).await;

    let a = create_product(&pool, &unique("a"), Price::from_minor_units(100)).await;
    let b = create_product(&pool, &unique("b"), Price::from_minor_units(200)).await;
    service.add_line(&mut owner, a).await.expect("add a");
    service.add_line(&mut owner, b).await.expect("add b");

    service.clear(&mut owner).await.expect("clear");
    assert!(service.lines(&owner).await.expect("lines").is_empty());

    // Clearing again is still fine.
    service.clear(&mut owner).await.expect("clear again");
}
