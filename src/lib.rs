//! Bookstore management API: authentication, role-based access control, and
//! CRUD for books, categories, and externally hosted cover images.

pub mod app;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use error::AppError;
pub use infra::image_host::ImageHostClient;
pub use transport::http::{create_router, ApiDoc, AppState};
