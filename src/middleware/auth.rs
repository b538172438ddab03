use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use uuid::Uuid;

use crate::{error::AppError, models::Role, state::AppState};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// What a request wants to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    AdminPanel,
    Catalog,
    UserProfile(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

/// The single authorization rule set. Admins may do anything; everyone else
/// may read the catalog and manage their own profile.
pub fn authorize(subject: &AuthUser, resource: Resource, action: Action) -> Result<(), AppError> {
    if subject.is_admin() {
        return Ok(());
    }

    let allowed = match (resource, action) {
        (Resource::AdminPanel, _) => false,
        (Resource::Catalog, Action::Read) => true,
        (Resource::Catalog, Action::Write) => false,
        (Resource::UserProfile(owner), _) => owner == subject.user_id,
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Extracts the bearer token, if any. A present but malformed header is an
/// authentication failure rather than "no token".
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

    Ok(Some(token.to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;

        let user_id = state.sessions.resolve(&token).await?;

        let user = state
            .storage
            .get_user_by_id(user_id)
            .await
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;

        Ok(AuthUser {
            user_id,
            role: user.role,
        })
    }
}

/// An authenticated caller that has passed the admin-panel check.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize(&user, Resource::AdminPanel, Action::Read)?;
        Ok(AdminUser(user))
    }
}
