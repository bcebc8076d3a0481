//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use promptstash_core::{CommonTagService, EntryService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Authentication lookups.
    pub user_service: UserService,
    /// Entry listing, grouping, search and ingestion.
    pub entry_service: EntryService,
    /// Per-user tag aggregation.
    pub common_tag_service: CommonTagService,
}

/// Authentication middleware.
///
/// Resolves the bearer token to a user and stashes it in request
/// extensions; handlers requiring auth reject via [`crate::extractors::AuthUser`]
/// when nothing was stashed.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        // Authenticate user by token
        if let Ok(user) = state.user_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}
