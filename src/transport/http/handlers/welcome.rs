// Sample protected endpoints exercising the two access tiers.

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::transport::http::extract::{AdminUser, AuthUser};

#[utoipa::path(
    get,
    path = "/api/home/welcome",
    responses(
        (status = 200, description = "Greeting with the caller's claims"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn home_welcome_handler(
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({
        "success": true,
        "message": format!("Welcome to the home page {}", claims.username),
        "user": {
            "username": claims.username,
            "userId": claims.user_id,
            "role": claims.role,
        },
    })))
}

#[utoipa::path(
    get,
    path = "/api/admin/welcome",
    responses(
        (status = 200, description = "Admin greeting"),
        (status = 403, description = "Authenticated but not admin")
    )
)]
pub async fn admin_welcome_handler(
    AdminUser(claims): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({
        "success": true,
        "message": format!("Welcome to the admin page {}", claims.username),
    })))
}
