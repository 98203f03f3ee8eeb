use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::app::images;
use crate::error::AppError;
use crate::transport::http::extract::{AdminUser, AuthUser};
use crate::transport::http::handlers::common::parse_id;
use crate::transport::http::types::AppState;

/// Upload size cap, matching the documented 5 MB limit.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

fn acceptable_mime(content_type: &str) -> bool {
    content_type.starts_with("image/") || content_type.starts_with("video/")
}

#[utoipa::path(
    post,
    path = "/api/image/upload",
    responses(
        (status = 200, description = "Cover stored on the external host and recorded"),
        (status = 400, description = "No file, wrong MIME type, or over 5 MB"),
        (status = 500, description = "External image host failure")
    )
)]
pub async fn upload_image_handler(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !acceptable_mime(&content_type) {
            return Err(AppError::validation("Invalid file type"));
        }

        let file_name = field
            .file_name()
            .unwrap_or("upload")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Failed to read uploaded file: {e}")))?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::validation("File must be at most 5MB"));
        }

        let image = images::upload_image(
            &state.pool,
            &state.image_host,
            bytes.to_vec(),
            file_name,
            content_type,
            claims.user_id,
        )
        .await?;

        return Ok(Json(json!({
            "success": true,
            "message": "Image uploaded successfully",
            "image": image,
        })));
    }

    Err(AppError::validation("No image provided"))
}

#[utoipa::path(
    get,
    path = "/api/image/allimages",
    responses((status = 200, description = "All image records"))
)]
pub async fn get_all_images_handler(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let images = images::list_images(&state.pool).await?;
    Ok(Json(json!({
        "success": true,
        "images": images,
    })))
}

#[utoipa::path(
    get,
    path = "/api/image/singleimage/{id}",
    params(("id" = String, Path, description = "Image id")),
    responses(
        (status = 200, description = "Image record"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn get_image_by_id_handler(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let image = images::get_image(&state.pool, parse_id(&id, "image")?).await?;
    Ok(Json(json!({
        "success": true,
        "image": image,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/image/deleteimage/{id}",
    params(("id" = String, Path, description = "Image id")),
    responses(
        (status = 200, description = "External asset and record deleted"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn delete_image_handler(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    images::delete_image(&state.pool, &state.image_host, parse_id(&id, "image")?).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Image deleted successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_gate_allows_images_and_videos_only() {
        assert!(acceptable_mime("image/png"));
        assert!(acceptable_mime("image/jpeg"));
        assert!(acceptable_mime("video/mp4"));
        assert!(!acceptable_mime("application/pdf"));
        assert!(!acceptable_mime("text/html"));
    }
}
