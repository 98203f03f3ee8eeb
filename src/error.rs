//! Application error taxonomy and its HTTP mapping.
//!
//! Every handler returns `Result<_, AppError>`; the `IntoResponse` impl is the
//! single place where errors become wire responses, always in the standard
//! `{"success": false, "message": ...}` envelope. Internal error details are
//! logged server-side and never sent to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed input (400).
    #[error("validation error: {0}")]
    Validation(String),

    /// Duplicate unique field or in-use entity (400). The optional count is
    /// reported as `inUseCount` (category deletion guard).
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        in_use_count: Option<i64>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// External image host failure, surfaced as a 500.
    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            in_use_count: None,
        }
    }

    pub fn conflict_in_use(message: impl Into<String>, in_use_count: i64) -> Self {
        Self::Conflict {
            message: message.into(),
            in_use_count: Some(in_use_count),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            // Duplicate unique fields are reported as 400 (matches the wire
            // contract the frontend was written against).
            AppError::Validation(_) | AppError::Conflict { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(anyhow::Error::new(e).context("database error"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "internal server error");
                "Internal server error".to_string()
            }
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "upstream image host failure");
                msg.clone()
            }
            other => other_message(other),
        };

        let mut body = json!({
            "success": false,
            "message": message,
        });
        if let AppError::Conflict {
            in_use_count: Some(count),
            ..
        } = &self
        {
            body["inUseCount"] = json!(count);
        }

        (status, Json(body)).into_response()
    }
}

fn other_message(err: &AppError) -> String {
    match err {
        AppError::Validation(m)
        | AppError::NotFound(m)
        | AppError::Unauthorized(m)
        | AppError::Forbidden(m) => m.clone(),
        AppError::Conflict { message, .. } => message.clone(),
        _ => unreachable!("handled by caller"),
    }
}
