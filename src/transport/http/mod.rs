pub mod extract;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod auth;
    pub mod books;
    pub mod categories;
    pub mod common;
    pub mod health;
    pub mod images;
    pub mod welcome;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
