use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{
        dto::PublicUser,
        extractors::AdminUser,
        is_valid_email,
        repo_types::{Role, User},
    },
    error::ApiError,
    response::ApiResponse,
    state::AppState,
};

use super::dto::UpdateUserRequest;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, _admin))]
pub async fn get_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<PublicUser>>>, ApiError> {
    let users = User::list(&state.db).await?;
    let data: Vec<PublicUser> = users.into_iter().map(PublicUser::from).collect();
    Ok(Json(ApiResponse::list(data.len(), data)))
}

#[instrument(skip(state, _admin))]
pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found with id of {}", id)))?;

    Ok(Json(ApiResponse::ok(user.into())))
}

#[instrument(skip(state, admin, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let AdminUser(caller) = admin;

    if let Some(email) = payload.email.as_mut() {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email".into()));
        }
    }

    // Role transitions stay admin-only because only this route accepts one.
    let role = payload
        .role
        .as_deref()
        .map(|r| {
            Role::parse(r)
                .ok_or_else(|| ApiError::Validation("Role must be 'user' or 'admin'".into()))
        })
        .transpose()?;

    let user = User::update_profile(
        &state.db,
        id,
        payload.name.as_deref(),
        payload.email.as_deref(),
        role.map(|r| r.as_str()),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("User not found with id of {}", id)))?;

    info!(admin_id = %caller.id, user_id = %user.id, "user updated by admin");
    Ok(Json(ApiResponse::ok(user.into())))
}

#[instrument(skip(state, admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let AdminUser(caller) = admin;

    // The target has to be loaded up front: the role guard needs its row.
    let target = User::find_by_id(&state.db, id).await?;
    authorize_delete(caller.id, id, target.as_ref())?;

    User::delete(&state.db, id).await?;

    info!(admin_id = %caller.id, user_id = %id, "user deleted");
    Ok(Json(ApiResponse::ok(format!(
        "Deleted user with id of: {}",
        id
    ))))
}

/// Ordered deletion guards: self-check, then existence, then role.
/// Deleting yourself reports the self-protection error even when the
/// target would also fail the later checks.
fn authorize_delete(
    caller_id: Uuid,
    target_id: Uuid,
    target: Option<&User>,
) -> Result<(), ApiError> {
    if target_id == caller_id {
        return Err(ApiError::Forbidden("You can't delete yourself".into()));
    }

    let target = target
        .ok_or_else(|| ApiError::NotFound(format!("User not found with id of {}", target_id)))?;

    if target.is_admin() {
        return Err(ApiError::Forbidden("You can't delete other admins".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn make_user(id: Uuid, role: &str) -> User {
        User {
            id,
            name: None,
            email: format!("{}@example.com", id),
            password_hash: "$argon2id$v=19$hash".into(),
            role: role.into(),
            reset_password_token_hash: None,
            reset_password_expires_at: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn self_deletion_is_forbidden_even_for_missing_rows() {
        let caller = Uuid::new_v4();
        // Target row absent: the self-check must still win over NotFound.
        let err = authorize_delete(caller, caller, None).unwrap_err();
        match err {
            ApiError::Forbidden(msg) => assert!(msg.contains("yourself")),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn self_deletion_is_forbidden_even_for_admin_callers() {
        let caller = Uuid::new_v4();
        let target = make_user(caller, "admin");
        let err = authorize_delete(caller, caller, Some(&target)).unwrap_err();
        match err {
            ApiError::Forbidden(msg) => assert!(msg.contains("yourself")),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn missing_target_is_not_found_not_forbidden() {
        let err = authorize_delete(Uuid::new_v4(), Uuid::new_v4(), None).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn deleting_another_admin_is_forbidden() {
        let target_id = Uuid::new_v4();
        let target = make_user(target_id, "admin");
        let err = authorize_delete(Uuid::new_v4(), target_id, Some(&target)).unwrap_err();
        match err {
            ApiError::Forbidden(msg) => assert!(msg.contains("admins")),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn deleting_a_regular_user_passes() {
        let target_id = Uuid::new_v4();
        let target = make_user(target_id, "user");
        assert!(authorize_delete(Uuid::new_v4(), target_id, Some(&target)).is_ok());
    }
}
