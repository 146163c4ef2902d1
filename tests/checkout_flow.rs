use std::sync::Arc;

use artisan_crafts_api::{
    config::{AppConfig, RazorpayConfig},
    db::{create_orm_conn, create_pool, run_migrations},
    dto::cart::AddToCartRequest,
    dto::payments::VerifyPaymentRequest,
    entity::{products::ActiveModel as ProductActive, users::ActiveModel as UserActive},
    error::AppError,
    gateway::{RazorpayClient, sign_payment},
    middleware::auth::AuthUser,
    models::{CartItem, Order, OrderItem},
    services::{cart_service, payment_service, workshop_service},
    state::AppState,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

const TEST_SECRET: &str = "test_key_secret";

// Integration flow: a paid cart is materialized into an order exactly once;
// a bad signature or a total mismatch leaves no trace.
#[tokio::test]
async fn payment_verification_materializes_cart() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(());
            }
        };

    let state = setup_state(&database_url).await?;

    let user_id = create_user(&state, "buyer@example.com").await?;
    let auth_user = AuthUser {
        user_id,
        role: "user".into(),
    };

    let product_a = create_product(&state, "Clay Pottery Bowl", dec!(10.00), 10).await?;
    let product_b = create_product(&state, "Beaded Bracelet", dec!(5.00), 10).await?;

    cart_service::upsert_cart_item(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: product_a,
            quantity: 2,
        },
    )
    .await?;
    cart_service::upsert_cart_item(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: product_b,
            quantity: 1,
        },
    )
    .await?;

    // A forged signature must not create an order or touch the cart.
    let err = payment_service::verify_payment(
        &state,
        VerifyPaymentRequest {
            razorpay_order_id: "order_abc".into(),
            razorpay_payment_id: "pay_xyz".into(),
            razorpay_signature: "deadbeef".into(),
            user_id,
            total_amount: dec!(25.00),
        },
    )
    .await
    .expect_err("forged signature must be rejected");
    assert!(matches!(err, AppError::InvalidSignature));
    assert_eq!(count_orders(&state, user_id).await?, 0);
    assert_eq!(cart_rows(&state, user_id).await?.len(), 2);

    // The genuine signature materializes the cart.
    let signature = sign_payment(TEST_SECRET, "order_abc", "pay_xyz");
    let resp = payment_service::verify_payment(
        &state,
        VerifyPaymentRequest {
            razorpay_order_id: "order_abc".into(),
            razorpay_payment_id: "pay_xyz".into(),
            razorpay_signature: signature.clone(),
            user_id,
            total_amount: dec!(25.00),
        },
    )
    .await?;
    assert!(resp.success);

    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(resp.order_id)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(order.user_id, user_id);
    assert_eq!(order.status, "completed");
    assert_eq!(order.total_amount, dec!(25.00));
    assert_eq!(order.payment_id.as_deref(), Some("pay_xyz"));

    let mut items: Vec<OrderItem> =
        sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1")
            .bind(resp.order_id)
            .fetch_all(&state.pool)
            .await?;
    items.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].product_id, product_a);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].price_at_purchase, dec!(10.00));
    assert_eq!(items[1].product_id, product_b);
    assert_eq!(items[1].quantity, 1);
    assert_eq!(items[1].price_at_purchase, dec!(5.00));

    assert!(cart_rows(&state, user_id).await?.is_empty());

    // The verification leaves an audit trail row.
    let audited: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM audit_logs WHERE user_id = $1 AND action = 'payment_verified'",
    )
    .bind(user_id)
    .fetch_one(&state.pool)
    .await?;
    assert_eq!(audited.0, 1);

    // Replaying the same payment must not create a second order.
    let err = payment_service::verify_payment(
        &state,
        VerifyPaymentRequest {
            razorpay_order_id: "order_abc".into(),
            razorpay_payment_id: "pay_xyz".into(),
            razorpay_signature: signature,
            user_id,
            total_amount: dec!(25.00),
        },
    )
    .await
    .expect_err("replayed payment must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(count_orders(&state, user_id).await?, 1);

    Ok(())
}

// A totalAmount that disagrees with the cart rolls the whole transaction
// back, including the already-inserted order row.
#[tokio::test]
async fn mismatched_total_rolls_back() -> anyhow::Result<()> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(());
            }
        };

    let state = setup_state(&database_url).await?;

    let user_id = create_user(&state, "mismatch@example.com").await?;
    let auth_user = AuthUser {
        user_id,
        role: "user".into(),
    };
    let product = create_product(&state, "Ceramic Mug Set", dec!(38.99), 10).await?;

    cart_service::upsert_cart_item(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: product,
            quantity: 1,
        },
    )
    .await?;

    let signature = sign_payment(TEST_SECRET, "order_mis", "pay_mis");
    let err = payment_service::verify_payment(
        &state,
        VerifyPaymentRequest {
            razorpay_order_id: "order_mis".into(),
            razorpay_payment_id: "pay_mis".into(),
            razorpay_signature: signature,
            user_id,
            total_amount: dec!(10.00),
        },
    )
    .await
    .expect_err("mismatched total must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));

    assert_eq!(count_orders(&state, user_id).await?, 0);
    assert_eq!(cart_rows(&state, user_id).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn cart_quantity_zero_removes_row() -> anyhow::Result<()> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(());
            }
        };

    let state = setup_state(&database_url).await?;

    let user_id = create_user(&state, "cart@example.com").await?;
    let auth_user = AuthUser {
        user_id,
        role: "user".into(),
    };
    let product = create_product(&state, "Paper Flower Bouquet", dec!(22.99), 10).await?;

    cart_service::upsert_cart_item(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: product,
            quantity: 2,
        },
    )
    .await?;
    assert_eq!(cart_rows(&state, user_id).await?.len(), 1);

    cart_service::upsert_cart_item(
        &state,
        &auth_user,
        AddToCartRequest {
            product_id: product,
            quantity: 0,
        },
    )
    .await?;
    assert!(cart_rows(&state, user_id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn workshop_registration_rejects_duplicates() -> anyhow::Result<()> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(());
            }
        };

    let state = setup_state(&database_url).await?;

    let user_id = create_user(&state, "workshop@example.com").await?;
    let auth_user = AuthUser {
        user_id,
        role: "user".into(),
    };
    let workshop_id = create_workshop(&state, "Linocut Printing").await?;

    // An unknown workshop id is a 404, not a silent no-op.
    let err = workshop_service::register_for_workshop(&state, &auth_user, Uuid::new_v4())
        .await
        .expect_err("unknown workshop must be rejected");
    assert!(matches!(err, AppError::NotFound));

    let resp = workshop_service::register_for_workshop(&state, &auth_user, workshop_id).await?;
    let registration = resp.data.expect("registration data").registration;
    assert_eq!(registration.user_id, user_id);
    assert_eq!(registration.workshop_id, workshop_id);

    // A second registration for the same workshop is rejected.
    let err = workshop_service::register_for_workshop(&state, &auth_user, workshop_id)
        .await
        .expect_err("duplicate registration must be rejected");
    match err {
        AppError::BadRequest(message) => {
            assert_eq!(message, "Already registered for this workshop")
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }

    let mine = workshop_service::my_workshops(&state, &auth_user).await?;
    assert_eq!(mine.data.expect("workshop list").items.len(), 1);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-jwt-secret".into(),
        razorpay: Some(RazorpayConfig {
            key_id: "rzp_test_key".into(),
            key_secret: TEST_SECRET.into(),
        }),
    };
    let gateway = config.razorpay.as_ref().map(RazorpayClient::new);

    // Clear any rows left over from previous runs for the test users.
    let backend = orm.get_database_backend();
    for email in [
        "buyer@example.com",
        "mismatch@example.com",
        "cart@example.com",
        "workshop@example.com",
    ] {
        orm.execute(Statement::from_sql_and_values(
            backend,
            "DELETE FROM users WHERE email = $1",
            [email.into()],
        ))
        .await?;
    }

    Ok(AppState {
        pool,
        orm,
        config: Arc::new(config),
        gateway,
    })
}

async fn create_user(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set("user".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn create_product(
    state: &AppState,
    name: &str,
    price: Decimal,
    stock: i32,
) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(price),
        stock: Set(stock),
        image_url: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(product.id)
}

async fn create_workshop(state: &AppState, title: &str) -> anyhow::Result<Uuid> {
    // Drop any copy left over from a previous run.
    sqlx::query("DELETE FROM workshops WHERE title = $1")
        .bind(title)
        .execute(&state.pool)
        .await?;

    let date = NaiveDate::from_ymd_opt(2026, 10, 3)
        .ok_or_else(|| anyhow::anyhow!("invalid workshop date"))?;
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO workshops (id, title, description, workshop_date, workshop_time, instructor, level)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind("Carve and print your own linocut design")
    .bind(date)
    .bind("10:00 AM - 1:00 PM")
    .bind("Meera Joshi")
    .bind("Beginner")
    .fetch_one(&state.pool)
    .await?;

    Ok(id)
}

async fn count_orders(state: &AppState, user_id: Uuid) -> anyhow::Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&state.pool)
        .await?;
    Ok(count.0)
}

async fn cart_rows(state: &AppState, user_id: Uuid) -> anyhow::Result<Vec<CartItem>> {
    let rows = sqlx::query_as("SELECT * FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(&state.pool)
        .await?;
    Ok(rows)
}
