use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

/// Storefront actions that leave a row in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserRegistered,
    UserLoggedIn,
    PaymentOrderCreated,
    PaymentVerified,
    CartUpdated,
    CartRemoved,
    WorkshopRegistered,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::UserRegistered => "user_register",
            AuditAction::UserLoggedIn => "user_login",
            AuditAction::PaymentOrderCreated => "payment_order_created",
            AuditAction::PaymentVerified => "payment_verified",
            AuditAction::CartUpdated => "cart_update",
            AuditAction::CartRemoved => "cart_remove",
            AuditAction::WorkshopRegistered => "workshop_register",
        }
    }

    fn resource(self) -> &'static str {
        match self {
            AuditAction::UserRegistered | AuditAction::UserLoggedIn => "users",
            AuditAction::PaymentOrderCreated => "payments",
            AuditAction::PaymentVerified => "orders",
            AuditAction::CartUpdated | AuditAction::CartRemoved => "cart_items",
            AuditAction::WorkshopRegistered => "workshop_registrations",
        }
    }
}

/// Insert an audit row. Auditing must never fail the request it describes,
/// so insert errors are logged and swallowed here.
pub async fn record(pool: &DbPool, user_id: Option<Uuid>, action: AuditAction, metadata: Value) {
    let result = sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action.as_str())
    .bind(action.resource())
    .bind(metadata)
    .execute(pool)
    .await;

    if let Err(err) = result {
        tracing::warn!(error = %err, action = action.as_str(), "audit log failed");
    }
}
