//! Directory endpoints.

use axum::{Json, Router, extract::State, routing::get};
use promptstash_common::AppResult;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState};

/// Response for the directory listing.
#[derive(Debug, Serialize)]
pub struct ListDirectoriesResponse {
    pub directories: Vec<String>,
}

/// List the distinct entry dates for the requester (set semantics).
async fn list_directories(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ListDirectoriesResponse>> {
    let directories = state.entry_service.directories(&user.id).await?;
    Ok(Json(ListDirectoriesResponse { directories }))
}

/// Create the directory router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_directories))
}
