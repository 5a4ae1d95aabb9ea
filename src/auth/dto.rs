use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{Role, User};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Request body for login. Fields default to empty so the handler, not the
/// deserializer, decides how absent credentials fail.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for self-service profile updates.
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Response returned after register, login or reset completion; the same
/// token also rides in the `token` cookie.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// Public part of the user returned to clients.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        let role = user.role();
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_carries_password_material() {
        let user = User {
            id: Uuid::new_v4(),
            name: Some("Ada".into()),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            role: "admin".into(),
            reset_password_token_hash: Some("digest".into()),
            reset_password_expires_at: Some(OffsetDateTime::now_utc()),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("ada@example.com"));
        assert!(json.contains(r#""role":"admin""#));
        assert!(!json.contains("secret"));
        assert!(!json.contains("digest"));
    }

    #[test]
    fn login_request_defaults_missing_fields_to_empty() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
    }
}
