use artisan_crafts_api::error::AppError;
use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};

#[tokio::test]
async fn not_found_renders_flat_error_body() {
    let response = AppError::NotFound.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json, serde_json::json!({ "error": "Not Found" }));
}

#[tokio::test]
async fn payment_errors_map_to_bad_request() {
    for err in [
        AppError::InvalidAmount,
        AppError::InvalidSignature,
        AppError::GatewayUnavailable,
    ] {
        let message = err.to_string();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json, serde_json::json!({ "error": message }));
    }
}
