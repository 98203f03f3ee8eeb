use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::app::auth::{
    self, ChangePasswordRequest, ChangeUsernameRequest, LoginRequest, RegisterRequest,
};
use crate::error::AppError;
use crate::transport::http::extract::{AuthUser, Json};
use crate::transport::http::types::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Missing fields or username/email already taken")
    )
)]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth::register(&state.pool, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "user": user,
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "No such user")
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (access_token, user) = auth::login(&state.pool, &state.jwt_secret, request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "accessToken": access_token,
        "user": user,
    })))
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password replaced"),
        (status = 401, description = "Old password does not verify")
    )
)]
pub async fn change_password_handler(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth::change_password(&state.pool, claims.user_id, request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Password changed successfully",
    })))
}

#[utoipa::path(
    post,
    path = "/api/auth/change-username",
    request_body = ChangeUsernameRequest,
    responses(
        (status = 200, description = "Username updated"),
        (status = 400, description = "Too short, unchanged, or already taken")
    )
)]
pub async fn change_username_handler(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(request): Json<ChangeUsernameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth::change_username(&state.pool, claims.user_id, request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Username changed successfully",
        "user": user,
    })))
}
