use std::fmt;
use std::future::Future;

use shared_types::{Relationship, SearchResult};

use crate::query::ObituaryQuery;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgObituaryStore;

/// Failure reported by a store adapter. The message is for logs only.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error: {}", self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::new(err.to_string())
    }
}

/// One page of rows plus the total count of the same predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub rows: Vec<SearchResult>,
    pub total: i64,
}

// ── Trait ────────────────────────────────────────────────────────────

/// Read access to obituary records.
///
/// Methods return `Send` futures so generic axum handlers stay `Send`.
pub trait ObituaryStore: Send + Sync {
    /// Fetch one page and count all matches, both against one snapshot.
    fn find_and_count(
        &self,
        query: &ObituaryQuery,
    ) -> impl Future<Output = Result<SearchPage, StoreError>> + Send;

    /// Look up a single record by its public reference.
    fn find_by_reference(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<Option<SearchResult>, StoreError>> + Send;

    /// Relationship types ordered by name.
    fn list_relationships(
        &self,
    ) -> impl Future<Output = Result<Vec<Relationship>, StoreError>> + Send;

    /// Cheap liveness probe.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
