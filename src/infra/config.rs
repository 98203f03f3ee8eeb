//! Centralized configuration (environment variables + defaults).

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

/// Secret used to sign and verify bearer tokens (required).
pub fn jwt_secret() -> String {
    std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set")
}

/// Address the HTTP server binds to.
pub fn bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

/// Base URL of the external image host (required for image uploads).
pub fn image_host_url() -> String {
    std::env::var("IMAGE_HOST_URL").expect("IMAGE_HOST_URL must be set")
}

/// API key presented to the external image host.
pub fn image_host_api_key() -> String {
    std::env::var("IMAGE_HOST_API_KEY").expect("IMAGE_HOST_API_KEY must be set")
}
