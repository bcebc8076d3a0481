//! API endpoints.

mod common_tags;
mod directories;
mod entries;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
///
/// Mounted under `/api/v1` by the server.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/common-tags", common_tags::router())
        .nest("/directories", directories::router())
        .nest("/entries", entries::router())
}
