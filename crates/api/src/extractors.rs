//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use promptstash_common::AppError;
use promptstash_db::entities::user;

/// Authenticated user extractor.
///
/// Rejects with [`AppError::Unauthorized`] so the response body carries
/// the standard `{"error":"Unauthorized"}` shape.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get user from request extensions (set by auth middleware)
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}
