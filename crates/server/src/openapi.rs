use axum::Router;
use shared_types::{
    AppError, AppErrorKind, DateSearchType, ObituarySearchRequest, Relationship, RelativeFilter,
    SearchResponse, SearchResult,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health::{self, HealthResponse};
use crate::rest;
use crate::store::ObituaryStore;

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::obituary::search_obituaries,
        rest::obituary::get_obituary,
        rest::obituary::list_relationships,
        health::health_check,
    ),
    components(schemas(
        AppError,
        AppErrorKind,
        DateSearchType,
        ObituarySearchRequest,
        RelativeFilter,
        SearchResponse,
        SearchResult,
        Relationship,
        HealthResponse,
    )),
    tags(
        (name = "obituaries", description = "Obituary search and lookup"),
        (name = "relationships", description = "Relationship types for the relatives facet"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Obituary Search API",
        description = "Faceted search over published obituaries",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build an Axum router that serves the API docs at `/docs`
/// and the REST API at `/api/*`.
pub fn app_router<S: ObituaryStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .merge(rest::api_router::<S>())
        .route("/health", axum::routing::get(health::health_check::<S>))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
