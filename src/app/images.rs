//! Cover image records and their external assets.
//!
//! The external asset and the local record are deleted together. Host-side
//! failures are logged and swallowed so the primary operation still
//! completes; the documented consistency model accepts the possible orphan.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::image::Image;
use crate::error::AppError;
use crate::infra::image_host::ImageHostClient;

const SELECT: &str =
    "SELECT id, image_url, external_asset_id, uploaded_by, created_at FROM images";

/// Forwards the uploaded bytes to the external host, then records the
/// resulting URL and asset id.
pub async fn upload_image(
    pool: &PgPool,
    image_host: &ImageHostClient,
    bytes: Vec<u8>,
    file_name: String,
    content_type: String,
    uploaded_by: Uuid,
) -> Result<Image, AppError> {
    let asset = image_host
        .upload(bytes, file_name, content_type)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "image host upload failed");
            AppError::upstream("Error uploading image")
        })?;

    let image: Image = sqlx::query_as(
        "INSERT INTO images (id, image_url, external_asset_id, uploaded_by) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, image_url, external_asset_id, uploaded_by, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&asset.url)
    .bind(&asset.asset_id)
    .bind(uploaded_by)
    .fetch_one(pool)
    .await?;

    tracing::info!(image_id = %image.id, asset_id = %image.external_asset_id, "image uploaded");
    Ok(image)
}

pub async fn list_images(pool: &PgPool) -> Result<Vec<Image>, AppError> {
    let sql = format!("{SELECT} ORDER BY created_at DESC");
    Ok(sqlx::query_as(&sql).fetch_all(pool).await?)
}

pub async fn get_image(pool: &PgPool, id: Uuid) -> Result<Image, AppError> {
    let sql = format!("{SELECT} WHERE id = $1");
    let image: Option<Image> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    image.ok_or_else(|| AppError::not_found("Image not found"))
}

/// Deletes the external asset, then the record. `NotFound` if the record is
/// already gone.
pub async fn delete_image(
    pool: &PgPool,
    image_host: &ImageHostClient,
    id: Uuid,
) -> Result<(), AppError> {
    let image = get_image(pool, id).await?;

    if let Err(e) = image_host.delete(&image.external_asset_id).await {
        tracing::warn!(
            image_id = %id,
            asset_id = %image.external_asset_id,
            error = ?e,
            "external asset deletion failed, removing record anyway"
        );
    }

    sqlx::query("DELETE FROM images WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    tracing::info!(image_id = %id, "image deleted");
    Ok(())
}

/// Best-effort variant used by the book service when a cover is replaced or
/// its book deleted: never fails the caller's primary operation.
pub async fn cleanup_image(pool: &PgPool, image_host: &ImageHostClient, id: Uuid) {
    if let Err(e) = delete_image(pool, image_host, id).await {
        tracing::warn!(image_id = %id, error = %e, "orphaned image cleanup failed");
    }
}
