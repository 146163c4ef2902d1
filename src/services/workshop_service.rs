use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::workshops::{RegistrationResponse, WorkshopList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Workshop, WorkshopRegistration},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_workshops(state: &AppState) -> AppResult<ApiResponse<WorkshopList>> {
    let items =
        sqlx::query_as::<_, Workshop>("SELECT * FROM workshops ORDER BY workshop_date")
            .fetch_all(&state.pool)
            .await?;

    Ok(ApiResponse::success(
        "OK",
        WorkshopList { items },
        Some(Meta::empty()),
    ))
}

pub async fn register_for_workshop(
    state: &AppState,
    user: &AuthUser,
    workshop_id: Uuid,
) -> AppResult<ApiResponse<RegistrationResponse>> {
    let workshop_exist: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM workshops WHERE id = $1")
            .bind(workshop_id)
            .fetch_optional(&state.pool)
            .await?;
    if workshop_exist.is_none() {
        return Err(AppError::NotFound);
    }

    let exist: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM workshop_registrations WHERE user_id = $1 AND workshop_id = $2",
    )
    .bind(user.user_id)
    .bind(workshop_id)
    .fetch_optional(&state.pool)
    .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest(
            "Already registered for this workshop".to_string(),
        ));
    }

    let registration: WorkshopRegistration = sqlx::query_as(
        r#"
        INSERT INTO workshop_registrations (id, user_id, workshop_id)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(workshop_id)
    .fetch_one(&state.pool)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::WorkshopRegistered,
        serde_json::json!({ "workshop_id": workshop_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Registered",
        RegistrationResponse { registration },
        None,
    ))
}

pub async fn my_workshops(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<WorkshopList>> {
    let items = sqlx::query_as::<_, Workshop>(
        r#"
        SELECT w.*
        FROM workshop_registrations wr
        JOIN workshops w ON w.id = wr.workshop_id
        WHERE wr.user_id = $1
        ORDER BY w.workshop_date
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "OK",
        WorkshopList { items },
        Some(Meta::empty()),
    ))
}
