use crate::app::auth::{
    ChangePasswordRequest, ChangeUsernameRequest, LoginRequest, RegisterRequest,
};
use crate::app::books::{CreateBookRequest, Pagination, UpdateBookRequest};
use crate::app::categories::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::domain::book::BookListing;
use crate::domain::category::Category;
use crate::domain::image::Image;
use crate::domain::user::PublicUser;
use crate::transport::http::handlers::{auth, books, categories, health, images, welcome};
use crate::transport::http::types::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        auth::register_handler,
        auth::login_handler,
        auth::change_password_handler,
        auth::change_username_handler,
        books::get_books_handler,
        books::get_book_handler,
        books::create_book_handler,
        books::update_book_handler,
        books::delete_book_handler,
        categories::list_categories_handler,
        categories::create_category_handler,
        categories::update_category_handler,
        categories::delete_category_handler,
        images::upload_image_handler,
        images::get_all_images_handler,
        images::get_image_by_id_handler,
        images::delete_image_handler,
        welcome::home_welcome_handler,
        welcome::admin_welcome_handler
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        ChangePasswordRequest,
        ChangeUsernameRequest,
        CreateBookRequest,
        UpdateBookRequest,
        CreateCategoryRequest,
        UpdateCategoryRequest,
        PublicUser,
        BookListing,
        Pagination,
        Category,
        Image
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/change-password", post(auth::change_password_handler))
        .route("/api/auth/change-username", post(auth::change_username_handler))
        .route("/api/books/get-books", get(books::get_books_handler))
        .route("/api/books/get-book/:id", get(books::get_book_handler))
        .route("/api/books/create-book", post(books::create_book_handler))
        .route("/api/books/update-book/:id", put(books::update_book_handler))
        .route("/api/books/delete-book/:id", delete(books::delete_book_handler))
        .route(
            "/api/categories",
            get(categories::list_categories_handler).post(categories::create_category_handler),
        )
        .route(
            "/api/categories/:id",
            put(categories::update_category_handler).delete(categories::delete_category_handler),
        )
        .route("/api/image/upload", post(images::upload_image_handler))
        .route("/api/image/allimages", get(images::get_all_images_handler))
        .route("/api/image/singleimage/:id", get(images::get_image_by_id_handler))
        .route("/api/image/deleteimage/:id", delete(images::delete_image_handler))
        .route("/api/home/welcome", get(welcome::home_welcome_handler))
        .route("/api/admin/welcome", get(welcome::admin_welcome_handler))
        // Leave headroom above the 5 MB file cap for multipart framing.
        .layer(DefaultBodyLimit::max(images::MAX_UPLOAD_BYTES + 64 * 1024))
        .with_state(app_state)
}
