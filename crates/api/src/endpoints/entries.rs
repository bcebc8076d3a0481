//! Entry endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use promptstash_common::{AppError, AppResult};
use promptstash_core::{CreateEntryInput, EntryDetailResponse, EntryListResponse};
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState};

/// Query parameters for the entries listing.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// Directory date filter, `YYYY-MM-DD`.
    pub directory: Option<String>,
    /// Free-text search over prompt fields.
    pub search: Option<String>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

/// Parse the directory parameter; an empty string means no filter.
fn parse_directory(directory: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match directory {
        None => Ok(None),
        Some(d) if d.trim().is_empty() => Ok(None),
        Some(d) => NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid directory date: {d}"))),
    }
}

/// List the requester's entries grouped by seed.
async fn list_entries(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListEntriesQuery>,
) -> AppResult<Json<EntryListResponse>> {
    let directory = parse_directory(query.directory.as_deref())?;

    let response = state
        .entry_service
        .list(
            &user.id,
            directory,
            query.search.as_deref(),
            query.limit,
            query.offset,
        )
        .await?;

    Ok(Json(response))
}

/// Single entry detail with the full-resolution URL.
async fn get_entry(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<EntryDetailResponse>> {
    let detail = state.entry_service.get_detail(&user, &id).await?;
    Ok(Json(detail))
}

/// Create an entry from a raw metadata blob.
async fn create_entry(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEntryInput>,
) -> AppResult<impl IntoResponse> {
    let detail = state.entry_service.create(&user.id, input).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Create the entries router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/{id}", get(get_entry))
}
