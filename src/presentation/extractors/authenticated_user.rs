use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::UserId;
use crate::presentation::handlers::ApiError;

/// Header set by the fronting identity provider once the caller is authenticated.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(UserId::parse)
            .map(AuthenticatedUser)
            .ok_or_else(|| {
                tracing::warn!("Rejected request without authenticated user");
                ApiError::unauthorized()
            })
    }
}
