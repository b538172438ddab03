use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

pub const SESSION_ID_HEADER: &str = "session-id";
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Cart scope taken from the `session-id` header. Requests without one share
/// the anonymous cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSession(pub String);

impl<S> FromRequestParts<S> for CartSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session_id = parts
            .headers
            .get(SESSION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(ANONYMOUS_SESSION);

        Ok(CartSession(session_id.to_string()))
    }
}
