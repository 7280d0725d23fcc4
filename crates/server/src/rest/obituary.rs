use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use shared_types::{AppError, ObituarySearchRequest, Relationship, SearchResponse, SearchResult};

use crate::db::AppState;
use crate::error_convert::{json_rejection_to_app_error, StoreErrorExt};
use crate::search::{self, SearchCriteria};
use crate::store::ObituaryStore;

// ── Search ──────────────────────────────────────────────────────────

/// POST /api/obituaries/search
#[utoipa::path(
    post,
    path = "/api/obituaries/search",
    request_body = ObituarySearchRequest,
    responses(
        (status = 200, description = "Matching obituaries", body = SearchResponse),
        (status = 400, description = "Malformed body", body = AppError),
        (status = 422, description = "Invalid search input", body = AppError),
        (status = 500, description = "Search failed", body = AppError)
    ),
    tag = "obituaries"
)]
#[tracing::instrument(skip(state, body))]
pub async fn search_obituaries<S: ObituaryStore + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<ObituarySearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(body) = body.map_err(json_rejection_to_app_error)?;
    let criteria = SearchCriteria::from_request(&body, state.default_page_size)?;
    let response = search::search(state.store.as_ref(), &criteria).await?;
    Ok(Json(response))
}

// ── Lookup ──────────────────────────────────────────────────────────

/// GET /api/obituaries/{reference}
#[utoipa::path(
    get,
    path = "/api/obituaries/{reference}",
    params(("reference" = String, Path, description = "Public obituary reference")),
    responses(
        (status = 200, description = "Obituary found", body = SearchResult),
        (status = 404, description = "No obituary with this reference", body = AppError)
    ),
    tag = "obituaries"
)]
#[tracing::instrument(skip(state))]
pub async fn get_obituary<S: ObituaryStore + 'static>(
    State(state): State<AppState<S>>,
    Path(reference): Path<String>,
) -> Result<Json<SearchResult>, AppError> {
    state
        .store
        .find_by_reference(&reference)
        .await
        .map_err(StoreErrorExt::into_app_error)?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Obituary {reference} not found")))
}

/// GET /api/relationships
#[utoipa::path(
    get,
    path = "/api/relationships",
    responses((status = 200, description = "Relationship types", body = Vec<Relationship>)),
    tag = "relationships"
)]
#[tracing::instrument(skip(state))]
pub async fn list_relationships<S: ObituaryStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Relationship>>, AppError> {
    let relationships = state
        .store
        .list_relationships()
        .await
        .map_err(StoreErrorExt::into_app_error)?;
    Ok(Json(relationships))
}
