use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;

impl User {
    /// Find a user by email. The returned row carries the password hash;
    /// callers expose users only through the public projection.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role,
                   reset_password_token_hash, reset_password_expires_at, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role,
                   reset_password_token_hash, reset_password_expires_at, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Create a new user with hashed password. Role defaults to 'user'.
    pub async fn create(
        db: &PgPool,
        name: Option<&str>,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, role,
                      reset_password_token_hash, reset_password_expires_at, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Apply only the provided profile fields; absent fields keep their value.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        role: Option<&str>,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                role = COALESCE($4, role)
            WHERE id = $1
            RETURNING id, name, email, password_hash, role,
                      reset_password_token_hash, reset_password_expires_at, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(role)
        .fetch_optional(db)
        .await
    }

    /// Persist the reset-token hash and expiry. Touches nothing else, so no
    /// other field is re-validated on the way through.
    pub async fn set_reset_token(
        db: &PgPool,
        id: Uuid,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_password_token_hash = $2, reset_password_expires_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Drop both reset fields together; they are never set or cleared apart.
    pub async fn clear_reset_token(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_password_token_hash = NULL, reset_password_expires_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Look up a user by reset-token hash, rejecting expired tokens at the
    /// query level.
    pub async fn find_by_reset_token(db: &PgPool, token_hash: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role,
                   reset_password_token_hash, reset_password_expires_at, created_at
            FROM users
            WHERE reset_password_token_hash = $1 AND reset_password_expires_at > now()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(db)
        .await
    }

    /// Store a new password hash and consume the reset token in one statement.
    pub async fn reset_password(
        db: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password_hash = $2,
                reset_password_token_hash = NULL,
                reset_password_expires_at = NULL
            WHERE id = $1
            RETURNING id, name, email, password_hash, role,
                      reset_password_token_hash, reset_password_expires_at, created_at
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role,
                   reset_password_token_hash, reset_password_expires_at, created_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Delete by id, returning whether a row existed.
    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
