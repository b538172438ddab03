use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::{
    audit::log_audit,
    dto::auth::{AuthSession, LoginRequest, RegisterRequest, UserLoginRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{NewUser, Role, User, UserProfile},
    response::{ApiResponse, Meta},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub(crate) fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<AuthSession>> {
    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_string();
    let username = payload
        .username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if !is_plausible_email(&email) {
        return Err(AppError::BadRequest("email is invalid".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    // Hash before touching storage; the uniqueness checks run under the insert's lock.
    let password_hash = hash_password(&payload.password)?;

    let user = state
        .storage
        .create_user(NewUser {
            username,
            name,
            email,
            password_hash,
            phone: payload.phone,
            address: payload.address,
            city: payload.city,
            country: payload.country,
            zip_code: payload.zip_code,
            ..NewUser::default()
        })
        .await?;

    log_audit(
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    );

    let session = start_session(state, &user).await;
    Ok(ApiResponse::success("User created", session, None))
}

/// Username login. Any active account may use it; the admin panel checks the
/// returned role itself and the server re-checks on every admin route.
pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<AuthSession>> {
    let LoginRequest { username, password } = payload;
    let user = state.storage.get_user_by_username(username.trim()).await;
    let user = check_credentials(user, &password)?;

    let session = start_session(state, &user).await;
    Ok(ApiResponse::success("Logged in", session, Some(Meta::empty())))
}

/// Email login for shoppers. Admin accounts are refused here.
pub async fn login_shopper(
    state: &AppState,
    payload: UserLoginRequest,
) -> AppResult<ApiResponse<AuthSession>> {
    let UserLoginRequest { email, password } = payload;
    let user = state
        .storage
        .get_user_by_email(email.trim())
        .await
        .filter(|user| user.role == Role::User);
    let user = check_credentials(user, &password)?;

    let session = start_session(state, &user).await;
    Ok(ApiResponse::success("Logged in", session, Some(Meta::empty())))
}

pub async fn logout_user(state: &AppState, token: Option<String>) -> ApiResponse<serde_json::Value> {
    if let Some(token) = token {
        if let Ok(user_id) = state.sessions.resolve(&token).await {
            log_audit(Some(user_id), "user_logout", Some("sessions"), None);
        }
        state.sessions.destroy(&token).await;
    }

    ApiResponse::success("Logged out", serde_json::json!({}), Some(Meta::empty()))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserProfile>> {
    let found = state
        .storage
        .get_user_by_id(user.user_id)
        .await
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(ApiResponse::success("OK", UserProfile::from(&found), None))
}

fn check_credentials(user: Option<User>, password: &str) -> AppResult<User> {
    let Some(user) = user.filter(|u| u.is_active) else {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "rejected login attempt");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    Ok(user)
}

async fn start_session(state: &AppState, user: &User) -> AuthSession {
    let session = state.sessions.create(user.id).await;

    log_audit(
        Some(user.id),
        "session_start",
        Some("sessions"),
        Some(serde_json::json!({ "expires": session.expires })),
    );

    AuthSession {
        session_id: session.token,
        user: UserProfile::from(user),
    }
}
