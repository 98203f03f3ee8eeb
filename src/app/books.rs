//! Book catalog: paginated listing with category/image joins, CRUD, and the
//! best-effort cleanup of a replaced or orphaned cover image.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::app::images;
use crate::domain::book::{year_in_range, Book, BookListing};
use crate::error::AppError;
use crate::infra::image_host::ImageHostClient;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

const LISTING_SELECT: &str = r#"
    SELECT b.id, b.title, b.author, b.year,
           b.category_id, c.name AS category_name, c.slug AS category_slug,
           b.image_id, i.image_url,
           b.created_at, b.updated_at
    FROM books b
    LEFT JOIN categories c ON c.id = b.category_id
    LEFT JOIN images i ON i.id = b.image_id
"#;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListBooksQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Category slug filter.
    pub category: Option<String>,
    /// Category id filter (takes precedence over the slug form).
    #[serde(rename = "categoryId")]
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_books: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// `has_next_page` holds exactly when `page * limit < total`.
    pub fn compute(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            current_page: page,
            total_pages,
            total_books: total,
            has_next_page: page * limit < total,
            has_prev_page: page > 1,
        }
    }
}

fn normalize_paging(query: &ListBooksQuery) -> (i64, i64) {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub category_id: Option<Uuid>,
    pub image_id: Option<Uuid>,
}

/// Partial update. For the reference fields the outer `Option` distinguishes
/// "field absent" from an explicit `null` (which clears the reference).
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "crate::app::present")]
    #[schema(value_type = Option<Uuid>)]
    pub category_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "crate::app::present")]
    #[schema(value_type = Option<Uuid>)]
    pub image_id: Option<Option<Uuid>>,
}

/// Newest-first page of books joined with category and cover data.
/// An unknown slug filter yields an empty page, not an error.
pub async fn list_books(
    pool: &PgPool,
    query: ListBooksQuery,
) -> Result<(Vec<BookListing>, Pagination), AppError> {
    let (page, limit) = normalize_paging(&query);

    let category_filter: Option<Uuid> = match (query.category_id, query.category.as_deref()) {
        (Some(id), _) => Some(id),
        (None, Some(slug)) if !slug.trim().is_empty() => {
            let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE slug = $1")
                .bind(slug.trim())
                .fetch_optional(pool)
                .await?;
            match row {
                Some((id,)) => Some(id),
                None => return Ok((Vec::new(), Pagination::compute(page, limit, 0))),
            }
        }
        _ => None,
    };

    let (total, books): (i64, Vec<BookListing>) = match category_filter {
        Some(category_id) => {
            let (total,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM books WHERE category_id = $1")
                    .bind(category_id)
                    .fetch_one(pool)
                    .await?;
            let sql = format!(
                "{LISTING_SELECT} WHERE b.category_id = $1 \
                 ORDER BY b.created_at DESC LIMIT $2 OFFSET $3"
            );
            let books = sqlx::query_as(&sql)
                .bind(category_id)
                .bind(limit)
                .bind((page - 1) * limit)
                .fetch_all(pool)
                .await?;
            (total, books)
        }
        None => {
            let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
                .fetch_one(pool)
                .await?;
            let sql = format!("{LISTING_SELECT} ORDER BY b.created_at DESC LIMIT $1 OFFSET $2");
            let books = sqlx::query_as(&sql)
                .bind(limit)
                .bind((page - 1) * limit)
                .fetch_all(pool)
                .await?;
            (total, books)
        }
    };

    Ok((books, Pagination::compute(page, limit, total)))
}

pub async fn get_book(pool: &PgPool, id: Uuid) -> Result<BookListing, AppError> {
    let sql = format!("{LISTING_SELECT} WHERE b.id = $1");
    let book: Option<BookListing> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    book.ok_or_else(|| AppError::not_found("Book not found"))
}

async fn fetch_book(pool: &PgPool, id: Uuid) -> Result<Option<Book>, AppError> {
    let book = sqlx::query_as(
        "SELECT id, title, author, year, category_id, image_id, created_at, updated_at \
         FROM books WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(book)
}

async fn ensure_category_exists(pool: &PgPool, category_id: Uuid) -> Result<(), AppError> {
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::validation(
            "Referenced category does not exist",
        ));
    }
    Ok(())
}

fn validate_title_author(title: &str, author: &str) -> Result<(String, String), AppError> {
    let title = title.trim();
    let author = author.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if title.chars().count() > 100 {
        return Err(AppError::validation(
            "Title must be less than 100 characters",
        ));
    }
    if author.is_empty() {
        return Err(AppError::validation("Author is required"));
    }
    Ok((title.to_string(), author.to_string()))
}

pub async fn create_book(pool: &PgPool, req: CreateBookRequest) -> Result<BookListing, AppError> {
    let (title, author) = validate_title_author(&req.title, &req.author)?;
    if !year_in_range(req.year) {
        return Err(AppError::validation(
            "Year must be between 1000 and the current year",
        ));
    }
    if let Some(category_id) = req.category_id {
        ensure_category_exists(pool, category_id).await?;
    }

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO books (id, title, author, year, category_id, image_id) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(&title)
    .bind(&author)
    .bind(req.year)
    .bind(req.category_id)
    .bind(req.image_id)
    .execute(pool)
    .await?;

    tracing::info!(book_id = %id, title = %title, "book created");
    get_book(pool, id).await
}

/// Applies a partial update. When the image reference changes, the previously
/// referenced image (external asset + record) is deleted best-effort first;
/// this sequence is not atomic with the book write.
pub async fn update_book(
    pool: &PgPool,
    image_host: &ImageHostClient,
    id: Uuid,
    req: UpdateBookRequest,
) -> Result<BookListing, AppError> {
    let Some(current) = fetch_book(pool, id).await? else {
        return Err(AppError::not_found("Book not found"));
    };

    let (title, author) = validate_title_author(
        req.title.as_deref().unwrap_or(&current.title),
        req.author.as_deref().unwrap_or(&current.author),
    )?;
    let year = req.year.unwrap_or(current.year);
    if !year_in_range(year) {
        return Err(AppError::validation(
            "Year must be between 1000 and the current year",
        ));
    }

    let category_id = match req.category_id {
        Some(new_category) => {
            if let Some(category_id) = new_category {
                ensure_category_exists(pool, category_id).await?;
            }
            new_category
        }
        None => current.category_id,
    };

    let image_id = match req.image_id {
        Some(new_image) => {
            if new_image != current.image_id {
                if let Some(old_image) = current.image_id {
                    images::cleanup_image(pool, image_host, old_image).await;
                }
            }
            new_image
        }
        None => current.image_id,
    };

    sqlx::query(
        "UPDATE books SET title = $1, author = $2, year = $3, category_id = $4, \
         image_id = $5, updated_at = now() WHERE id = $6",
    )
    .bind(&title)
    .bind(&author)
    .bind(year)
    .bind(category_id)
    .bind(image_id)
    .bind(id)
    .execute(pool)
    .await?;

    tracing::info!(book_id = %id, "book updated");
    get_book(pool, id).await
}

/// Deletes the book's cover image best-effort, then the book itself.
pub async fn delete_book(
    pool: &PgPool,
    image_host: &ImageHostClient,
    id: Uuid,
) -> Result<(), AppError> {
    let Some(book) = fetch_book(pool, id).await? else {
        return Err(AppError::not_found("Book not found"));
    };

    if let Some(image_id) = book.image_id {
        images::cleanup_image(pool, image_host, image_id).await;
    }

    sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    tracing::info!(book_id = %id, "book deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_next_page_iff_more_rows_exist() {
        for (page, limit, total) in [(1, 5, 11), (2, 5, 11), (3, 5, 11), (1, 10, 0), (4, 5, 11)] {
            let p = Pagination::compute(page, limit, total);
            assert_eq!(p.has_next_page, page * limit < total, "{page}/{limit}/{total}");
        }
    }

    #[test]
    fn pagination_page_counts() {
        let p = Pagination::compute(1, 5, 11);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.total_books, 11);
        assert!(!p.has_prev_page);

        let p = Pagination::compute(3, 5, 11);
        assert!(!p.has_next_page);
        assert!(p.has_prev_page);

        let p = Pagination::compute(1, 5, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
    }

    #[test]
    fn paging_defaults_and_clamps() {
        let (page, limit) = normalize_paging(&ListBooksQuery::default());
        assert_eq!((page, limit), (1, DEFAULT_PAGE_SIZE));

        let (page, limit) = normalize_paging(&ListBooksQuery {
            page: Some(-2),
            limit: Some(10_000),
            ..Default::default()
        });
        assert_eq!((page, limit), (1, MAX_PAGE_SIZE));
    }

    #[test]
    fn update_payload_distinguishes_null_from_absent() {
        let req: UpdateBookRequest = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert!(req.image_id.is_none());

        let req: UpdateBookRequest = serde_json::from_str(r#"{"imageId":null}"#).unwrap();
        assert_eq!(req.image_id, Some(None));

        let id = Uuid::new_v4();
        let body = format!(r#"{{"imageId":"{id}"}}"#);
        let req: UpdateBookRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(req.image_id, Some(Some(id)));
    }

    #[test]
    fn title_and_author_are_trimmed_and_bounded() {
        let (title, author) = validate_title_author("  Dune ", " Frank Herbert ").unwrap();
        assert_eq!((title.as_str(), author.as_str()), ("Dune", "Frank Herbert"));
        assert!(validate_title_author("", "a").is_err());
        assert!(validate_title_author(&"x".repeat(101), "a").is_err());
        assert!(validate_title_author("t", "  ").is_err());
    }
}
