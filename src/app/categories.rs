//! Category management: alphabetical listing, slug-backed CRUD, and the
//! in-use guard that blocks deleting a category still referenced by books.

use serde::Deserialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::category::{slugify, Category};
use crate::error::AppError;

const SELECT: &str = "SELECT id, name, slug, description, created_at FROM categories";

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update. For `description` the outer `Option` distinguishes
/// "field absent" from an explicit `null` (which clears it).
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::app::present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name is required"));
    }
    if name.chars().count() > 50 {
        return Err(AppError::validation(
            "Category name must be less than 50 characters",
        ));
    }
    Ok(name.to_string())
}

fn validate_description(description: &str) -> Result<String, AppError> {
    let description = description.trim();
    if description.chars().count() > 200 {
        return Err(AppError::validation(
            "Description must be less than 200 characters",
        ));
    }
    Ok(description.to_string())
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>, AppError> {
    let sql = format!("{SELECT} ORDER BY name ASC");
    Ok(sqlx::query_as(&sql).fetch_all(pool).await?)
}

pub async fn create_category(
    pool: &PgPool,
    req: CreateCategoryRequest,
) -> Result<Category, AppError> {
    let name = validate_name(&req.name)?;
    let description = req
        .description
        .as_deref()
        .map(validate_description)
        .transpose()?;

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind(&name)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::conflict("Category already exists"));
    }

    let category: Category = sqlx::query_as(
        "INSERT INTO categories (id, name, slug, description) VALUES ($1, $2, $3, $4) \
         RETURNING id, name, slug, description, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(slugify(&name))
    .bind(description)
    .fetch_one(pool)
    .await?;

    tracing::info!(category = %category.name, slug = %category.slug, "category created");
    Ok(category)
}

/// Regenerates the slug whenever the name changes so URLs stay in sync.
pub async fn update_category(
    pool: &PgPool,
    id: Uuid,
    req: UpdateCategoryRequest,
) -> Result<Category, AppError> {
    let current: Option<Category> = {
        let sql = format!("{SELECT} WHERE id = $1");
        sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?
    };
    let Some(current) = current else {
        return Err(AppError::not_found("Category not found"));
    };

    let (name, slug) = match req.name.as_deref() {
        Some(new_name) => {
            let name = validate_name(new_name)?;
            let collision: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM categories WHERE name = $1 AND id <> $2")
                    .bind(&name)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
            if collision.is_some() {
                return Err(AppError::conflict("Category already exists"));
            }
            let slug = slugify(&name);
            (name, slug)
        }
        None => (current.name.clone(), current.slug.clone()),
    };

    let description = match req.description {
        Some(Some(ref d)) => Some(validate_description(d)?),
        Some(None) => None,
        None => current.description.clone(),
    };

    let updated: Category = sqlx::query_as(
        "UPDATE categories SET name = $1, slug = $2, description = $3 WHERE id = $4 \
         RETURNING id, name, slug, description, created_at",
    )
    .bind(&name)
    .bind(&slug)
    .bind(description)
    .bind(id)
    .fetch_one(pool)
    .await?;

    tracing::info!(category_id = %id, "category updated");
    Ok(updated)
}

/// Refuses deletion while any book references the category, reporting the
/// live count. The check and the delete are separate statements; there is no
/// stronger guarantee than the live count at check time.
pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let (in_use,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books WHERE category_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if in_use > 0 {
        return Err(AppError::conflict_in_use(
            "Cannot delete category while it is assigned to books",
            in_use,
        ));
    }

    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }

    tracing::info!(category_id = %id, "category deleted");
    Ok(())
}
