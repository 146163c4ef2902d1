use artisan_crafts_api::{
    config::RazorpayConfig,
    error::AppError,
    gateway::{RazorpayClient, sign_payment, to_minor_units, verify_payment_signature},
};
use axum::{Json, Router, http::StatusCode, routing::post};
use hmac::{Hmac, Mac};
use rust_decimal_macros::dec;
use sha2::Sha256;

const TEST_SECRET: &str = "test_key_secret";

#[test]
fn minor_units_multiplies_by_hundred() {
    assert_eq!(to_minor_units(dec!(25.00)).unwrap(), 2500);
    assert_eq!(to_minor_units(dec!(18.99)).unwrap(), 1899);
    assert_eq!(to_minor_units(dec!(1)).unwrap(), 100);
}

#[test]
fn minor_units_rounds_to_nearest() {
    assert_eq!(to_minor_units(dec!(10.004)).unwrap(), 1000);
    assert_eq!(to_minor_units(dec!(10.005)).unwrap(), 1001);
    assert_eq!(to_minor_units(dec!(10.006)).unwrap(), 1001);
}

#[test]
fn minor_units_rejects_non_positive_amounts() {
    assert!(matches!(to_minor_units(dec!(0)), Err(AppError::InvalidAmount)));
    assert!(matches!(
        to_minor_units(dec!(-5.00)),
        Err(AppError::InvalidAmount)
    ));
}

#[test]
fn signature_is_hmac_over_pipe_joined_ids() {
    // Independently compute HMAC-SHA256 over the concatenated payload.
    let mut mac = Hmac::<Sha256>::new_from_slice(TEST_SECRET.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(b"order_abc|pay_xyz");
    let expected = hex::encode(mac.finalize().into_bytes());

    assert_eq!(sign_payment(TEST_SECRET, "order_abc", "pay_xyz"), expected);
}

#[test]
fn valid_signature_is_accepted() {
    let signature = sign_payment(TEST_SECRET, "order_abc", "pay_xyz");
    assert!(verify_payment_signature(
        TEST_SECRET,
        "order_abc",
        "pay_xyz",
        &signature
    ));
}

#[test]
fn tampered_signature_is_rejected() {
    let signature = sign_payment(TEST_SECRET, "order_abc", "pay_xyz");

    assert!(!verify_payment_signature(
        TEST_SECRET,
        "order_abc",
        "pay_other",
        &signature
    ));
    assert!(!verify_payment_signature(
        "wrong_secret",
        "order_abc",
        "pay_xyz",
        &signature
    ));
    assert!(!verify_payment_signature(
        TEST_SECRET,
        "order_abc",
        "pay_xyz",
        "not-even-hex"
    ));
}

fn test_client(base_url: String) -> RazorpayClient {
    RazorpayClient::new(&RazorpayConfig {
        key_id: "rzp_test_key".into(),
        key_secret: TEST_SECRET.into(),
    })
    .with_base_url(base_url)
}

async fn spawn_fake_gateway(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake gateway");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve fake gateway");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn create_order_returns_gateway_order() {
    let router = Router::new().route(
        "/v1/orders",
        post(|Json(body): Json<serde_json::Value>| async move {
            Json(serde_json::json!({
                "id": "order_abc",
                "amount": body["amount"],
                "currency": body["currency"],
                "receipt": body["receipt"],
                "status": "created",
            }))
        }),
    );
    let base_url = spawn_fake_gateway(router).await;

    let order = test_client(base_url)
        .create_order(2500, "INR", "rcpt_1")
        .await
        .expect("order created");

    assert_eq!(order.id, "order_abc");
    assert_eq!(order.amount, 2500);
    assert_eq!(order.currency, "INR");
    assert_eq!(order.receipt.as_deref(), Some("rcpt_1"));
}

#[tokio::test]
async fn create_order_surfaces_gateway_error_description() {
    let router = Router::new().route(
        "/v1/orders",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": {
                        "code": "BAD_REQUEST_ERROR",
                        "description": "Authentication failed",
                    }
                })),
            )
        }),
    );
    let base_url = spawn_fake_gateway(router).await;

    let err = test_client(base_url)
        .create_order(100, "INR", "rcpt_1")
        .await
        .expect_err("gateway must reject");

    match err {
        AppError::GatewayRejected(description) => {
            assert_eq!(description, "Authentication failed")
        }
        other => panic!("expected GatewayRejected, got {other:?}"),
    }
}
