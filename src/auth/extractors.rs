use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{jwt::JwtKeys, repo_types::User},
    error::ApiError,
    state::AppState,
};

/// Authorization stage for private routes: validates the bearer token and
/// yields the caller's id.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("invalid Authorization header".into()))?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("invalid or expired token".into())
        })?;

        Ok(AuthUser(claims.sub))
    }
}

/// Authorization stage for admin routes: a valid token whose user still
/// exists and carries the admin role. Yields the caller's full record so
/// handlers can apply self-protection rules.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;

        let user = User::find_by_id(&state.db, user_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::Unauthorized("user no longer exists".into()))?;

        if !user.is_admin() {
            warn!(user_id = %user.id, "admin route denied");
            return Err(ApiError::Forbidden("admin access required".into()));
        }

        Ok(AdminUser(user))
    }
}
