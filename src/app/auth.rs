//! Account registration, login, and self-service credential changes.

use serde::Deserialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::crypto::{password, token};
use crate::domain::user::{PublicUser, Role, User};
use crate::error::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to "user"; anything other than "admin" is treated as "user".
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUsernameRequest {
    pub new_username: String,
}

pub async fn register(pool: &PgPool, req: RegisterRequest) -> Result<PublicUser, AppError> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_string();
    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::validation(
            "username, email and password are required",
        ));
    }

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE username = $1 OR email = $2")
            .bind(&username)
            .bind(&email)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::conflict(
            "User already exists with this username or email",
        ));
    }

    let role = Role::parse(req.role.as_deref().unwrap_or("user"));
    let password_hash = password::hash_password(&req.password)?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, email, password_hash, role, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    tracing::info!(username = %user.username, "user registered");
    Ok(PublicUser::from(&user))
}

/// Verifies credentials and issues a 15-minute bearer token.
pub async fn login(
    pool: &PgPool,
    jwt_secret: &str,
    req: LoginRequest,
) -> Result<(String, PublicUser), AppError> {
    let username = req.username.as_deref().map(str::trim).unwrap_or("");
    let email = req.email.as_deref().map(str::trim).unwrap_or("");
    if username.is_empty() && email.is_empty() {
        return Err(AppError::validation("username or email is required"));
    }

    let user: Option<User> = sqlx::query_as(
        "SELECT id, username, email, password_hash, role, created_at \
         FROM users WHERE username = $1 OR email = $2",
    )
    .bind(username)
    .bind(email)
    .fetch_optional(pool)
    .await?;

    let Some(user) = user else {
        return Err(AppError::not_found("User not found"));
    };

    if !password::verify_password(&req.password, &user.password_hash) {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let access_token = token::issue_token(jwt_secret, user.id, &user.username, &user.role)?;
    Ok((access_token, PublicUser::from(&user)))
}

pub async fn change_password(
    pool: &PgPool,
    user_id: Uuid,
    req: ChangePasswordRequest,
) -> Result<(), AppError> {
    if req.new_password.is_empty() {
        return Err(AppError::validation("New password is required"));
    }

    let user: Option<User> = sqlx::query_as(
        "SELECT id, username, email, password_hash, role, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    let Some(user) = user else {
        return Err(AppError::not_found("User not found"));
    };

    if !password::verify_password(&req.old_password, &user.password_hash) {
        return Err(AppError::unauthorized("Old password is incorrect"));
    }

    let new_hash = password::hash_password(&req.new_password)?;
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(&new_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    tracing::info!(user_id = %user_id, "password changed");
    Ok(())
}

pub async fn change_username(
    pool: &PgPool,
    user_id: Uuid,
    req: ChangeUsernameRequest,
) -> Result<PublicUser, AppError> {
    let new_username = req.new_username.trim().to_string();
    if new_username.chars().count() < 3 {
        return Err(AppError::validation(
            "Username must be at least 3 characters",
        ));
    }

    let user: Option<User> = sqlx::query_as(
        "SELECT id, username, email, password_hash, role, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    let Some(user) = user else {
        return Err(AppError::not_found("User not found"));
    };

    if user.username == new_username {
        return Err(AppError::validation(
            "New username matches the current username",
        ));
    }

    let taken: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1 AND id <> $2")
        .bind(&new_username)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    if taken.is_some() {
        return Err(AppError::conflict("Username is already taken"));
    }

    let updated: User = sqlx::query_as(
        "UPDATE users SET username = $1 WHERE id = $2 \
         RETURNING id, username, email, password_hash, role, created_at",
    )
    .bind(&new_username)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    tracing::info!(user_id = %user_id, username = %new_username, "username changed");
    Ok(PublicUser::from(&updated))
}
