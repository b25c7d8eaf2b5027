//! Opt-in bridge to an external full-text search engine.
//!
//! When a caller attaches a backend, the provider forwards the composed and
//! baseline queries to it instead of filtering in SQL, and maps the raw
//! matches back into the regular response envelope. A backend can decline a
//! request by returning `None` from [`FulltextBackend::paginate`], which
//! falls the call back to plain SQL filtering.

use crate::errors::GridError;
use async_trait::async_trait;
use sea_orm::JsonValue;
use sea_orm::sea_query::SelectStatement;

/// One page of raw matches from the external engine.
#[derive(Debug, Clone, Default)]
pub struct FulltextPage {
    pub rows: Vec<JsonValue>,
    /// Total number of matches for the searched query, used as the filtered
    /// counter.
    pub total: u64,
}

#[async_trait]
pub trait FulltextBackend: Send + Sync {
    /// Fetch a page of matches for the composed (search-filtered) query.
    /// `limit` is `None` when the client asked for all rows. Returning
    /// `Ok(None)` declines the request and falls back to SQL filtering.
    async fn paginate(
        &self,
        query: &SelectStatement,
        limit: Option<u64>,
        offset: u64,
    ) -> Result<Option<FulltextPage>, GridError>;

    /// Match count for the baseline (pre-search) query; the total counter.
    async fn count(&self, query: &SelectStatement) -> Result<u64, GridError>;
}
