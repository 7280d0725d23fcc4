pub mod obituary;

use axum::{
    routing::{get, post},
    Router,
};

use crate::db::AppState;
use crate::store::ObituaryStore;

pub use obituary::*;

/// Build the REST API router.
pub fn api_router<S: ObituaryStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/api/obituaries/search", post(obituary::search_obituaries::<S>))
        .route("/api/obituaries/{reference}", get(obituary::get_obituary::<S>))
        .route("/api/relationships", get(obituary::list_relationships::<S>))
}
