use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Book row as stored. `category_id` and `image_id` are soft references:
/// nothing at the storage layer enforces them.
#[derive(Debug, Clone, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub category_id: Option<Uuid>,
    pub image_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Listing row joined with category name/slug and cover image URL.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookListing {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub image_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Publication years are accepted from 1000 through the current year.
pub fn year_in_range(year: i32) -> bool {
    year >= 1000 && year <= Utc::now().year()
}
