use hmac::{Hmac, Mac};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{
    config::RazorpayConfig,
    error::{AppError, AppResult},
};

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

type HmacSha256 = Hmac<Sha256>;

/// Convert a major-unit amount to the gateway's minor-unit representation
/// (paise for INR): multiply by 100, round to the nearest integer.
pub fn to_minor_units(amount: Decimal) -> AppResult<i64> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidAmount);
    }
    (amount * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(AppError::InvalidAmount)
}

/// Hex-encoded HMAC-SHA256 over `order_id + "|" + payment_id`, keyed with
/// the gateway key secret. This is what the gateway sends back alongside a
/// completed payment.
pub fn sign_payment(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time check of a gateway-supplied signature. Non-hex input is
/// treated as a mismatch.
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let Ok(supplied) = hex::decode(signature) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac.verify_slice(&supplied).is_ok()
}

/// REST client for the Razorpay orders API.
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// The gateway-owned order record, as returned by order creation.
#[derive(Debug, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    #[serde(default)]
    error: Option<GatewayErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    #[serde(default)]
    description: Option<String>,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different gateway host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The public key identifier, safe to hand to the payment widget.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn key_secret(&self) -> &str {
        &self.key_secret
    }

    /// Create a gateway order over HTTP Basic auth. A non-success response
    /// surfaces the gateway's own error description.
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> AppResult<GatewayOrder> {
        let response = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderBody {
                amount,
                currency,
                receipt,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let description = response
                .json::<GatewayErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.description)
                .unwrap_or_else(|| format!("Failed to create order ({status})"));
            return Err(AppError::GatewayRejected(description));
        }

        let order = response.json::<GatewayOrder>().await?;
        Ok(order)
    }
}
