//! Request extractors.
//!
//! `AuthUser` verifies the bearer token (401 on anything missing, malformed,
//! or expired); `AdminUser` additionally requires the admin role (403). No
//! database lookup happens here: trust lives entirely in the signed claims,
//! so a role change does not invalidate tokens issued before it.
//!
//! `Json` and `Query` wrap the axum extractors so malformed bodies and query
//! strings are rejected through [`AppError`] and stay inside the standard
//! `{"success": false, "message": ...}` envelope.

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::header::AUTHORIZATION,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use crate::crypto::token::{self, Claims};
use crate::error::AppError;
use crate::transport::http::types::AppState;

/// Any authenticated caller.
pub struct AuthUser(pub Claims);

/// Authenticated caller with the admin role.
pub struct AdminUser(pub Claims);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Access denied: no login token"))?;
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Access denied: no login token"))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let state = AppState::from_ref(state);
        let claims = token::verify_token(&state.jwt_secret, token)?;
        Ok(AuthUser(claims))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err(AppError::forbidden("Access denied: not an admin"));
        }
        Ok(AdminUser(claims))
    }
}

/// `axum::Json` with enveloped rejections: a body that fails to parse answers
/// 400 through [`AppError::Validation`] instead of axum's plain-text reply.
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Json(value))
    }
}

impl<T: serde::Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// `axum::extract::Query` with the same enveloped-rejection treatment.
pub struct Query<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Query<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Query(value))
    }
}
