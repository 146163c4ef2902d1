use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Amount in major currency units.
    #[schema(value_type = f64)]
    pub amount: Decimal,
    /// Defaults to INR.
    pub currency: Option<String>,
    /// Merchant receipt token, echoed back by the gateway.
    pub receipt: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// Minor-unit amount as confirmed by the gateway.
    pub amount: i64,
    pub currency: String,
    /// Public key identifier for the client-side payment widget.
    pub key: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "totalAmount")]
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    #[serde(rename = "orderId")]
    pub order_id: Uuid,
    pub message: String,
}
