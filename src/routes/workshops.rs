use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::workshops::{RegistrationResponse, WorkshopList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::workshop_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workshops))
        .route("/mine", get(my_workshops))
        .route("/{id}/register", post(register_for_workshop))
}

#[utoipa::path(
    get,
    path = "/api/workshops",
    responses(
        (status = 200, description = "List workshops ordered by date", body = ApiResponse<WorkshopList>)
    ),
    tag = "Workshops"
)]
pub async fn list_workshops(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<WorkshopList>>> {
    let resp = workshop_service::list_workshops(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/workshops/{id}/register",
    params(
        ("id" = Uuid, Path, description = "Workshop ID")
    ),
    responses(
        (status = 200, description = "Registered", body = ApiResponse<RegistrationResponse>),
        (status = 400, description = "Already registered"),
        (status = 404, description = "Workshop not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Workshops"
)]
pub async fn register_for_workshop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RegistrationResponse>>> {
    let resp = workshop_service::register_for_workshop(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/workshops/mine",
    responses(
        (status = 200, description = "Workshops the caller registered for", body = ApiResponse<WorkshopList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Workshops"
)]
pub async fn my_workshops(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<WorkshopList>>> {
    let resp = workshop_service::my_workshops(&state, &user).await?;
    Ok(Json(resp))
}
