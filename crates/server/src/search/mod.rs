//! Obituary search service.
//!
//! Runs the primary faceted query and, when it finds nothing and a name was
//! supplied, a relaxed name-only query over the same page window.

use std::collections::HashMap;
use std::fmt;

use shared_types::{AppError, SearchResponse};

use crate::query::ObituaryQuery;
use crate::store::ObituaryStore;

pub mod criteria;
pub mod predicate;

pub use criteria::SearchCriteria;

/// Failure of a search call.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Malformed input, keyed by wire field name.
    InvalidInput(HashMap<String, String>),
    /// The store could not complete the query.
    SearchFailed,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidInput(fields) => {
                write!(f, "invalid search input ({} field(s))", fields.len())
            }
            SearchError::SearchFailed => write!(f, "search failed"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidInput(fields) => AppError::validation("Validation failed", fields),
            SearchError::SearchFailed => AppError::internal("Search failed"),
        }
    }
}

async fn run<S: ObituaryStore>(
    store: &S,
    query: &ObituaryQuery,
) -> Result<crate::store::SearchPage, SearchError> {
    store.find_and_count(query).await.map_err(|e| {
        tracing::error!(error = %e, "obituary query failed");
        SearchError::SearchFailed
    })
}

/// Execute a search.
///
/// The primary query ANDs every active facet. If it matches nothing and at
/// least one name was given, a partial-match query ORs the name fields and
/// drops every other facet. Its results are returned, flagged
/// `is_partial_match`, only when it finds something.
#[tracing::instrument(skip(store), fields(page = criteria.page, page_size = criteria.page_size))]
pub async fn search<S: ObituaryStore>(
    store: &S,
    criteria: &SearchCriteria,
) -> Result<SearchResponse, SearchError> {
    let primary = ObituaryQuery::paged(
        predicate::primary_predicate(criteria),
        criteria.page,
        criteria.page_size,
    );
    let page = run(store, &primary).await?;

    // Only an empty primary result with at least one name triggers the fallback.
    let relaxed = match predicate::relaxed_predicate(criteria) {
        Some(relaxed) if page.total == 0 => relaxed,
        _ => {
            return Ok(SearchResponse {
                results: page.rows,
                total_count: page.total,
                is_partial_match: false,
            })
        }
    };

    let fallback = ObituaryQuery::paged(relaxed, criteria.page, criteria.page_size);
    let partial = run(store, &fallback).await?;
    tracing::info!(
        primary_total = page.total,
        partial_total = partial.total,
        "no exact matches, tried partial name matches"
    );

    if partial.total == 0 {
        return Ok(SearchResponse {
            results: page.rows,
            total_count: page.total,
            is_partial_match: false,
        });
    }

    Ok(SearchResponse {
        results: partial.rows,
        total_count: partial.total,
        is_partial_match: true,
    })
}
