use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::users::UpdateProfileRequest,
    error::{AppError, AppResult},
    middleware::auth::{Action, AuthUser, Resource, authorize},
    models::{UserChanges, UserProfile},
    response::ApiResponse,
    services::auth_service::is_plausible_email,
    state::AppState,
};

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    authorize(user, Resource::UserProfile(id), Action::Write)?;

    let name = payload.name.map(|n| n.trim().to_string());
    if name.as_deref().is_some_and(str::is_empty) {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let email = payload.email.map(|e| e.trim().to_string());
    if email.as_deref().is_some_and(|e| !is_plausible_email(e)) {
        return Err(AppError::BadRequest("email is invalid".into()));
    }

    let changes = UserChanges {
        name,
        email,
        phone: payload.phone,
        address: payload.address,
        city: payload.city,
        country: payload.country,
        zip_code: payload.zip_code,
        avatar: payload.avatar,
        is_active: None,
    };

    let updated = state
        .storage
        .update_user(id, changes)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    log_audit(
        Some(user.user_id),
        "profile_update",
        Some("users"),
        Some(serde_json::json!({ "user_id": id })),
    );

    Ok(ApiResponse::success(
        "Profile updated",
        UserProfile::from(&updated),
        None,
    ))
}
