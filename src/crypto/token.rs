// Bearer token signing and verification (HS256).
//
// Trust is entirely in the signed claims: no database lookup happens on
// verification, so role changes only take effect once the current token
// expires (15 minutes).

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Token lifetime in seconds (15 minutes).
pub const TOKEN_TTL_SECS: i64 = 15 * 60;

/// Claims embedded in every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Issues a signed token for the given user identity.
pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    username: &str,
    role: &str,
) -> Result<String, AppError> {
    let claims = Claims {
        user_id,
        username: username.to_string(),
        role: role.to_string(),
        exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("token signing failed")))
}

/// Verifies signature and expiry, returning the decoded claims.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Access denied: invalid token"))
}
