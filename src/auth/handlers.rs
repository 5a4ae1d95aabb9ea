use axum::{
    extract::{FromRef, Path, State},
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{
            ForgotPasswordRequest, LoginRequest, PublicUser, RegisterRequest,
            ResetPasswordRequest, TokenResponse, UpdateMeRequest,
        },
        extractors::AuthUser,
        is_valid_email,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::User,
        reset::{generate_reset_token, hash_reset_token},
        MIN_PASSWORD_LEN,
    },
    error::ApiError,
    response::ApiResponse,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me).put(update_me))
        .route("/auth/forgotpassword", post(forgot_password))
        .route("/auth/resetpassword/:token", put(reset_password))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    // Pre-check for a friendly message; the unique index still wins the race.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Duplicate("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, payload.name.as_deref(), &payload.email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    token_response(&state, jar, user.id)
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        warn!("login with missing email or password");
        return Err(ApiError::InvalidCredentials);
    }

    // Unknown email and wrong password must be indistinguishable.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    token_response(&state, jar, user.id)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(ApiResponse::ok(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut payload): Json<UpdateMeRequest>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    if let Some(email) = payload.email.as_mut() {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
    }

    let user = User::update_profile(
        &state.db,
        user_id,
        payload.name.as_deref(),
        payload.email.as_deref(),
        None,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(ApiResponse::ok(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("There is no user with that email".into()))?;

    let token = generate_reset_token();
    let expires_at = OffsetDateTime::now_utc()
        + TimeDuration::minutes(state.config.reset_token_ttl_minutes);
    User::set_reset_token(&state.db, user.id, &hash_reset_token(&token), expires_at).await?;

    let reset_url = format!(
        "{}/api/v1/auth/resetpassword/{}",
        state.config.public_base_url, token
    );
    let message = format!(
        "You are receiving this email because you (or someone else) has requested \
         the reset of a password. Please make a PUT request to:\n\n{}",
        reset_url
    );

    if let Err(err) = state
        .mailer
        .send(&user.email, "Password reset token", &message)
        .await
    {
        warn!(user_id = %user.id, error = %err, "reset email failed, clearing token");
        // A reset token must never stay valid when the user was never notified.
        if let Err(clear_err) = User::clear_reset_token(&state.db, user.id).await {
            error!(user_id = %user.id, error = %clear_err, "failed to clear reset token");
        }
        return Err(ApiError::EmailDelivery);
    }

    let user = User::find_by_id(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    info!(user_id = %user.id, "reset email sent");
    Ok(Json(ApiResponse::ok(user.into())))
}

#[instrument(skip(state, jar, token, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let user = User::find_by_reset_token(&state.db, &hash_reset_token(&token))
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid or expired reset token".into()))?;

    let hash = hash_password(&payload.password)?;
    let user = User::reset_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password reset completed");
    token_response(&state, jar, user.id)
}

/// Mint a signed token and deliver it both as a JSON field and as the
/// `token` cookie.
fn token_response(
    state: &AppState,
    jar: CookieJar,
    user_id: Uuid,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(user_id)?;
    let cookie = token_cookie(state, token.clone());
    Ok((jar.add(cookie), Json(TokenResponse { success: true, token })))
}

/// Browser copy of the bearer token: HttpOnly, Secure only in production,
/// expiry from the configured number of days.
fn token_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build(("token", token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.production)
        .max_age(TimeDuration::days(state.config.jwt.cookie_ttl_days))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_serialization() {
        let response = TokenResponse {
            success: true,
            token: "header.payload.signature".into(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""success":true"#));
        assert!(json.contains("header.payload.signature"));
    }

    #[tokio::test]
    async fn token_cookie_is_http_only_and_plain_http_outside_production() {
        let state = AppState::fake();
        let cookie = token_cookie(&state, "tok".into());
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_ne!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age(),
            Some(TimeDuration::days(state.config.jwt.cookie_ttl_days))
        );
    }
}
