use axum::{
    Json, Router,
    extract::{Path, State},
    routing::put,
};
use uuid::Uuid;

use crate::{
    dto::users::UpdateProfileRequest,
    error::{AppError, AppResult},
    middleware::{auth::AuthUser, json::AppJson},
    models::UserProfile,
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(update_profile))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid update"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::not_found("User"))?;
    let resp = user_service::update_profile(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
