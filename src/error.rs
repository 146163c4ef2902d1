use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Razorpay credentials not configured")]
    GatewayUnavailable,

    /// The gateway answered with a non-success status; carries the
    /// gateway's own error description.
    #[error("{0}")]
    GatewayRejected(String),

    #[error("Gateway request failed: {0}")]
    GatewayRequest(#[from] reqwest::Error),

    #[error("Invalid payment signature")]
    InvalidSignature,

    #[error("Order could not be persisted: {0}")]
    PersistenceFailed(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Checkout materialization maps database failures into the payment
    /// error taxonomy instead of a bare 500.
    pub fn persistence(err: sea_orm::DbErr) -> Self {
        AppError::PersistenceFailed(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_)
            | AppError::InvalidAmount
            | AppError::GatewayUnavailable
            | AppError::GatewayRejected(_)
            | AppError::GatewayRequest(_)
            | AppError::InvalidSignature
            | AppError::PersistenceFailed(_) => StatusCode::BAD_REQUEST,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
