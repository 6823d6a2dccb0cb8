//! Integration tests for checkout and the purchase ledger.
//!
//! Require `PostgreSQL`; see crate docs. Run with `-- --ignored`.

use minimart_core::Price;
use minimart_integration_tests::{
    count_purchases, create_product, create_user, delete_product, test_pool, unique,
};
use minimart_storefront::db::PurchaseRepository;
use minimart_storefront::models::{CurrentUser, Product, SessionCart};
use minimart_storefront::services::cart::{CartOwner, CartService};
use minimart_storefront::services::checkout::{CheckoutError, CheckoutService};

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn checkout_creates_one_purchase_per_line_and_empties_cart() {
    let pool = test_pool().await;
    let cart = CartService::new(&pool);
    let username = unique("buyer");
    let user_id = create_user(&pool, &username).await;
    let mut owner = CartOwner::User(CurrentUser {
        id: user_id,
        username: username.clone(),
    });

    let a = create_product(&pool, &unique("a"), Price::from_minor_units(100)).await;
    let b = create_product(&pool, &unique("b"), Price::from_minor_units(200)).await;
    cart.add_line(&mut owner, a).await.expect("add a");
    cart.add_line(&mut owner, b).await.expect("add b");

    assert_eq!(
        cart.total_price(&owner).await.expect("total"),
        Price::from_minor_units(300)
    );

    let created = CheckoutService::new(&pool)
        .checkout(&mut owner, "1 Main St")
        .await
        .expect("checkout");

    assert_eq!(created, 2);
    assert!(cart.lines(&owner).await.expect("lines").is_empty());
    assert_eq!(count_purchases(&pool, &username).await, 2);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn checkout_empty_cart_fails_and_writes_nothing() {
    let pool = test_pool().await;
    let username = unique("empty-buyer");
    let user_id = create_user(&pool, &username).await;
    let mut owner = CartOwner::User(CurrentUser {
        id: user_id,
        username: username.clone(),
    });

    let err = CheckoutService::new(&pool)
        .checkout(&mut owner, "1 Main St")
        .await
        .expect_err("empty cart must fail");
    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(count_purchases(&pool, &username).await, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn quantity_is_not_expanded_into_purchase_rows() {
    // A line with quantity 3 still produces exactly one purchase row; the
    // quantity is tracked in the cart but discarded at checkout.
    let pool = test_pool().await;
    let username = unique("qty-buyer");
    let user_id = create_user(&pool, &username).await;
    let mut owner = CartOwner::User(CurrentUser {
        id: user_id,
        username: username.clone(),
    });

    let product = create_product(&pool, &unique("p"), Price::from_minor_units(100)).await;
    sqlx::query("INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, 3)")
        .bind(user_id)
        .bind(product)
        .execute(&pool)
        .await
        .expect("seed line");

    let created = CheckoutService::new(&pool)
        .checkout(&mut owner, "1 Main St")
        .await
        .expect("checkout");

    assert_eq!(created, 1);
    assert_eq!(count_purchases(&pool, &username).await, 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn racing_checkouts_charge_the_cart_once() {
    // The transaction consumes cart rows with DELETE ... RETURNING, so of two
    // concurrent checkouts for the same user exactly one gets the lines; the
    // other deletes nothing and fails with EmptyCart.
    let pool = test_pool().await;
    let cart = CartService::new(&pool);
    let username = unique("racer");
    let user_id = create_user(&pool, &username).await;
    let mut owner = CartOwner::User(CurrentUser {
        id: user_id,
        username: username.clone(),
    });

    let a = create_product(&pool, &unique("a"), Price::from_minor_units(100)).await;
    let b = create_product(&pool, &unique("b"), Price::from_minor_units(200)).await;
    cart.add_line(&mut owner, a).await.expect("add a");
    cart.add_line(&mut owner, b).await.expect("add b");

    let mut first = CartOwner::User(CurrentUser {
        id: user_id,
        username: username.clone(),
    });
    let mut second = CartOwner::User(CurrentUser {
        id: user_id,
        username: username.clone(),
    });

    let service = CheckoutService::new(&pool);
    let (r1, r2) = tokio::join!(
        service.checkout(&mut first, "1 Main St"),
        service.checkout(&mut second, "1 Main St"),
    );

    let (winner, loser) = if r1.is_ok() { (r1, r2) } else { (r2, r1) };
    assert_eq!(winner.expect("winning checkout"), 2);
    assert!(matches!(
        loser.expect_err("losing checkout"),
        CheckoutError::EmptyCart
    ));
    assert_eq!(count_purchases(&pool, &username).await, 2);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn anonymous_checkout_records_anonymous_person() {
    let pool = test_pool().await;
    let product_name = unique("anon-p");
    let id = create_product(&pool, &product_name, Price::from_minor_units(50)).await;

    let mut session_cart = SessionCart::default();
    session_cart.insert_snapshot(&Product {
        id,
        name: product_name,
        price: Price::from_minor_units(50),
    });
    let mut owner = CartOwner::Anonymous(session_cart);

    let address = unique("addr");
    let created = CheckoutService::new(&pool)
        .checkout(&mut owner, &address)
        .await
        .expect("checkout");
    assert_eq!(created, 1);

    // The session cart was cleared in place.
    assert!(owner.session_cart().expect("anonymous").is_empty());

    let row: (String,) =
        sqlx::query_as("SELECT person FROM purchases WHERE address = $1")
            .bind(&address)
            .fetch_one(&pool)
            .await
            .expect("fetch purchase");
    assert_eq!(row.0, "Anonymous");
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn vanished_product_rolls_back_whole_checkout() {
    let pool = test_pool().await;
    let a = create_product(&pool, &unique("a"), Price::from_minor_units(100)).await;
    let b = create_product(&pool, &unique("b"), Price::from_minor_units(200)).await;

    let mut session_cart = SessionCart::default();
    session_cart.insert_snapshot(&Product {
        id: a,
        name: "A".to_string(),
        price: Price::from_minor_units(100),
    });
    session_cart.insert_snapshot(&Product {
        id: b,
        name: "B".to_string(),
        price: Price::from_minor_units(200),
    });

    // The snapshot for B outlives its product.
    delete_product(&pool, b).await;

    let mut owner = CartOwner::Anonymous(session_cart);
    let address = unique("addr");
    let err = CheckoutService::new(&pool)
        .checkout(&mut owner, &address)
        .await
        .expect_err("vanished product must abort checkout");
    assert!(matches!(err, CheckoutError::ProductVanished(id) if id == b));

    // No partial writes: the row for A was rolled back too.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE address = $1")
        .bind(&address)
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(count, 0);

    // And the session cart is untouched.
    assert_eq!(owner.session_cart().expect("anonymous").len(), 2);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn purchase_history_is_scoped_and_newest_first() {
    let pool = test_pool().await;
    let cart = CartService::new(&pool);
    let checkout = CheckoutService::new(&pool);

    let alice = unique("alice");
    let bob = unique("bob");
    let alice_id = create_user(&pool, &alice).await;
    let bob_id = create_user(&pool, &bob).await;

    let first = create_product(&pool, &unique("first"), Price::from_minor_units(100)).await;
    let second = create_product(&pool, &unique("second"), Price::from_minor_units(200)).await;
    let other = create_product(&pool, &unique("other"), Price::from_minor_units(300)).await;

    let mut alice_owner = CartOwner::User(CurrentUser {
        id: alice_id,
        username: alice.clone(),
    });
    let mut bob_owner = CartOwner::User(CurrentUser {
        id: bob_id,
        username: bob.clone(),
    });

    // Two separate checkouts for alice, one for bob.
    cart.add_line(&mut alice_owner, first).await.expect("add");
    checkout
        .checkout(&mut alice_owner, "1 Main St")
        .await
        .expect("first checkout");

    cart.add_line(&mut alice_owner, second).await.expect("add");
    checkout
        .checkout(&mut alice_owner, "1 Main St")
        .await
        .expect("second checkout");

    cart.add_line(&mut bob_owner, other).await.expect("add");
    checkout
        .checkout(&mut bob_owner, "2 Side St")
        .await
        .expect("bob checkout");

    let history = PurchaseRepository::new(&pool)
        .list_by_person(&alice)
        .await
        .expect("history");

    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|p| p.person == alice));
    // Newest first: the second checkout's product leads.
    assert_eq!(history.first().map(|p| p.product_id), Some(second));
    assert!(history
        .windows(2)
        .all(|w| w[0].created_at >= w[1].created_at));
}
