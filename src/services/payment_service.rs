use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::payments::{
        CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse,
    },
    entity::{
        cart_items::{self, Column as CartCol, Entity as CartItems},
        order_items::ActiveModel as OrderItemActive,
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::Column as ProdCol,
    },
    error::{AppError, AppResult},
    gateway,
    middleware::auth::AuthUser,
    state::AppState,
};

/// Reserve an order on the payment gateway for the caller's cart total.
/// Nothing is persisted locally; the gateway order is external state.
pub async fn create_payment_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<CreateOrderResponse> {
    // Amount validation happens before any gateway interaction.
    let amount_minor = gateway::to_minor_units(payload.amount)?;
    let client = state.gateway.as_ref().ok_or(AppError::GatewayUnavailable)?;
    let currency = payload.currency.unwrap_or_else(|| "INR".to_string());

    tracing::info!(
        user_id = %user.user_id,
        amount = amount_minor,
        currency = %currency,
        "creating gateway order"
    );

    let order = client
        .create_order(amount_minor, &currency, &payload.receipt)
        .await?;

    tracing::info!(gateway_order_id = %order.id, "gateway order created");

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::PaymentOrderCreated,
        serde_json::json!({ "gateway_order_id": order.id, "amount": order.amount }),
    )
    .await;

    Ok(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key: client.key_id().to_string(),
    })
}

#[derive(Debug, FromQueryResult)]
struct CartPriceRow {
    product_id: Uuid,
    quantity: i32,
    price: Decimal,
}

/// Validate the gateway's payment signature and, on success, materialize the
/// user's cart into a persisted order inside a single transaction: insert
/// the order, snapshot each cart row into an order item at the current
/// product price, then clear the cart.
pub async fn verify_payment(
    state: &AppState,
    payload: VerifyPaymentRequest,
) -> AppResult<VerifyPaymentResponse> {
    let client = state.gateway.as_ref().ok_or(AppError::GatewayUnavailable)?;

    // The single authorization gate for the whole write sequence.
    if !gateway::verify_payment_signature(
        client.key_secret(),
        &payload.razorpay_order_id,
        &payload.razorpay_payment_id,
        &payload.razorpay_signature,
    ) {
        return Err(AppError::InvalidSignature);
    }

    tracing::info!(
        gateway_order_id = %payload.razorpay_order_id,
        "payment signature verified"
    );

    let txn = state.orm.begin().await.map_err(AppError::persistence)?;

    // At most one persisted order per gateway payment; the unique column on
    // orders.payment_id backs this up under concurrent verification.
    let existing = Orders::find()
        .filter(OrderCol::PaymentId.eq(payload.razorpay_payment_id.as_str()))
        .one(&txn)
        .await
        .map_err(AppError::persistence)?;
    if existing.is_some() {
        return Err(AppError::BadRequest("Payment already processed".into()));
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(payload.user_id),
        total_amount: Set(payload.total_amount),
        status: Set("completed".into()),
        payment_id: Set(Some(payload.razorpay_payment_id.clone())),
        payment_order_id: Set(Some(payload.razorpay_order_id.clone())),
        created_at: NotSet,
    }
    .insert(&txn)
    .await
    .map_err(AppError::persistence)?;

    let rows = CartItems::find()
        .select_only()
        .column_as(CartCol::ProductId, "product_id")
        .column_as(CartCol::Quantity, "quantity")
        .column_as(ProdCol::Price, "price")
        .join(JoinType::InnerJoin, cart_items::Relation::Products.def())
        .filter(CartCol::UserId.eq(payload.user_id))
        .lock(LockType::Update)
        .into_model::<CartPriceRow>()
        .all(&txn)
        .await
        .map_err(AppError::persistence)?;

    if rows.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    // The order items must sum to the order total.
    let cart_total: Decimal = rows
        .iter()
        .map(|row| row.price * Decimal::from(row.quantity))
        .sum();
    if cart_total != payload.total_amount {
        return Err(AppError::BadRequest(format!(
            "Cart total {cart_total} does not match paid amount {}",
            payload.total_amount
        )));
    }

    for row in &rows {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(row.product_id),
            quantity: Set(row.quantity),
            price_at_purchase: Set(row.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await
        .map_err(AppError::persistence)?;
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(payload.user_id))
        .exec(&txn)
        .await
        .map_err(AppError::persistence)?;

    txn.commit().await.map_err(AppError::persistence)?;

    tracing::info!(
        order_id = %order.id,
        user_id = %payload.user_id,
        "order materialized from cart"
    );

    audit::record(
        &state.pool,
        Some(payload.user_id),
        AuditAction::PaymentVerified,
        serde_json::json!({
            "order_id": order.id,
            "payment_id": payload.razorpay_payment_id,
        }),
    )
    .await;

    Ok(VerifyPaymentResponse {
        success: true,
        order_id: order.id,
        message: "Payment verified and order created successfully".to_string(),
    })
}
