use sqlx::PgPool;
use std::sync::Arc;

use crate::infra::image_host::ImageHostClient;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub image_host: Arc<ImageHostClient>,
    /// Token signing secret, resolved once at startup.
    pub jwt_secret: Arc<String>,
}
