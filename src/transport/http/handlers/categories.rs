use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::app::categories::{self, CreateCategoryRequest, UpdateCategoryRequest};
use crate::error::AppError;
use crate::transport::http::extract::{AdminUser, Json};
use crate::transport::http::handlers::common::parse_id;
use crate::transport::http::types::AppState;

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "All categories, alphabetical"))
)]
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = categories::list_categories(&state.pool).await?;
    Ok(Json(json!({
        "success": true,
        "categories": categories,
    })))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created with derived slug"),
        (status = 400, description = "Blank or duplicate name")
    )
)]
pub async fn create_category_handler(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = categories::create_category(&state.pool, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Category created",
            "category": category,
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated; slug regenerated on rename"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category_handler(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category =
        categories::update_category(&state.pool, parse_id(&id, "category")?, request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Category updated",
        "category": category,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 400, description = "Category still referenced by books (inUseCount reported)"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category_handler(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    categories::delete_category(&state.pool, parse_id(&id, "category")?).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Category deleted successfully",
    })))
}
