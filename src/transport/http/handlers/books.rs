use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::app::books::{self, CreateBookRequest, ListBooksQuery, UpdateBookRequest};
use crate::error::AppError;
use crate::transport::http::extract::{AdminUser, Json, Query};
use crate::transport::http::handlers::common::parse_id;
use crate::transport::http::types::AppState;

#[utoipa::path(
    get,
    path = "/api/books/get-books",
    params(ListBooksQuery),
    responses(
        (status = 200, description = "Page of books with pagination metadata")
    )
)]
pub async fn get_books_handler(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (books, pagination) = books::list_books(&state.pool, query).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Books fetched successfully",
        "books": books,
        "pagination": pagination,
    })))
}

#[utoipa::path(
    get,
    path = "/api/books/get-book/{id}",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book with joined category and cover"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book = books::get_book(&state.pool, parse_id(&id, "book")?).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Book fetched successfully",
        "book": book,
    })))
}

#[utoipa::path(
    post,
    path = "/api/books/create-book",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created"),
        (status = 400, description = "Invalid fields or unknown category reference"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn create_book_handler(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Json(request): Json<CreateBookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let book = books::create_book(&state.pool, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Book created successfully",
            "book": book,
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/books/update-book/{id}",
    params(("id" = String, Path, description = "Book id")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated; a replaced cover is cleaned up"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book_handler(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateBookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let book = books::update_book(
        &state.pool,
        &state.image_host,
        parse_id(&id, "book")?,
        request,
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Book updated successfully",
        "book": book,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/books/delete-book/{id}",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book and its cover image deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book_handler(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    books::delete_book(&state.pool, &state.image_host, parse_id(&id, "book")?).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Book deleted successfully",
    })))
}
