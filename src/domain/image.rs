use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Cover image record. The bytes live on the external host; this row keeps
/// the public URL plus the host-side asset id needed for deletion.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub image_url: String,
    pub external_asset_id: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}
