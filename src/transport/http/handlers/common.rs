use uuid::Uuid;

use crate::error::AppError;

/// Parses a path id, keeping the error enveloped instead of surfacing the
/// default extractor rejection.
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::validation(format!("Invalid {entity} id")))
}
