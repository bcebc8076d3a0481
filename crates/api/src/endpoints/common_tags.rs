//! Common tag endpoints.

use axum::{Json, Router, extract::State, routing::get};
use promptstash_common::AppResult;
use promptstash_core::CommonTagResponse;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState};

/// Response for the tag listing.
#[derive(Debug, Serialize)]
pub struct ListTagsResponse {
    pub tags: Vec<CommonTagResponse>,
}

/// List the requester's common tags, most used first.
async fn list_tags(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ListTagsResponse>> {
    let tags = state.common_tag_service.list_for_user(&user.id).await?;
    Ok(Json(ListTagsResponse { tags }))
}

/// Create the common tag router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_tags))
}
