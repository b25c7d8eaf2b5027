//! The per-call service object tying the pipeline together.
//!
//! One [`GridProvider`] owns one translation call: validate the request,
//! compose the query, compute counters, apply pagination, fetch the page and
//! assemble the envelope. Instances are plain values constructed per request
//! scope; nothing is registered globally and nothing is shared between
//! calls.

use crate::budget::TimeBudget;
use crate::catalog::ColumnCatalog;
use crate::compose::{self, ComposedGrid, GridSource};
use crate::count::{self, SIMPLE_PAGINATION_RECORDS};
use crate::errors::GridError;
use crate::fulltext::FulltextBackend;
use crate::models::{GridRequest, GridResponse, ValidGrid};
use crate::resolve::ColumnResolver;
use sea_orm::{ConnectionTrait, JsonValue, QueryResult, StatementBuilder};
use serde_json::Map;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Error text reported on degraded responses unless overridden.
pub const DEFAULT_TIMEOUT_MESSAGE: &str =
    "The request exceeded its time budget and was aborted";

/// Process-wide defaults a service hands to every provider it constructs.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Default time budget for calls without a per-call override; `None`
    /// means unlimited.
    pub time_budget: Option<Duration>,
    /// Error text for degraded responses.
    pub timeout_message: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            time_budget: None,
            timeout_message: DEFAULT_TIMEOUT_MESSAGE.to_owned(),
        }
    }
}

/// Builder-style service for one grid translation call.
pub struct GridProvider {
    request: GridRequest,
    config: GridConfig,
    aliases: BTreeMap<String, String>,
    strict: BTreeSet<String>,
    total_override: Option<u64>,
    simple: bool,
    time_budget: Option<Duration>,
    fulltext: Option<Box<dyn FulltextBackend>>,
}

impl GridProvider {
    #[must_use]
    pub fn new(request: GridRequest) -> Self {
        Self::with_config(request, GridConfig::default())
    }

    #[must_use]
    pub fn with_config(request: GridRequest, config: GridConfig) -> Self {
        Self {
            request,
            config,
            aliases: BTreeMap::new(),
            strict: BTreeSet::new(),
            total_override: None,
            simple: false,
            time_budget: None,
            fulltext: None,
        }
    }

    /// Logical key → raw SQL expression; overrides catalog resolution for
    /// the same key and is selected as `expression AS key`.
    #[must_use]
    pub fn aliases<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Columns that always use exact-match comparison regardless of their
    /// declared type.
    #[must_use]
    pub fn strict_search_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strict.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Caller-known total record count; skips the baseline count query.
    #[must_use]
    pub fn total_records(mut self, count: u64) -> Self {
        self.total_override = Some(count);
        self
    }

    /// Trade exact counts for the fixed sentinel plus a one-row over-fetch,
    /// for very large tables where counting is too expensive.
    #[must_use]
    pub fn simple_pagination(mut self) -> Self {
        self.simple = true;
        self
    }

    /// Per-call time budget, overriding the configured default.
    #[must_use]
    pub fn time_budget(mut self, limit: Duration) -> Self {
        self.time_budget = Some(limit);
        self
    }

    #[must_use]
    pub fn timeout_message(mut self, message: impl Into<String>) -> Self {
        self.config.timeout_message = message.into();
        self
    }

    /// Attach an external full-text engine for this call.
    #[must_use]
    pub fn fulltext(mut self, backend: Box<dyn FulltextBackend>) -> Self {
        self.fulltext = Some(backend);
        self
    }

    /// Translate the request against the source without executing anything,
    /// for callers that run the query themselves.
    pub fn compose(
        &self,
        source: GridSource,
        catalog: &ColumnCatalog,
    ) -> Result<ComposedGrid, GridError> {
        self.request.validate().ok_or(GridError::BadRequest)?;
        let table = source.table().to_owned();
        let resolver = ColumnResolver::new(&table, catalog, &self.aliases, &self.strict);
        Ok(compose::compose(source, &self.request, &resolver))
    }

    /// Run the full pipeline and assemble the response envelope.
    ///
    /// # Errors
    ///
    /// [`GridError::BadRequest`] when `draw`, `start` or `length` is
    /// missing; [`GridError::Database`] for data-source failures unrelated
    /// to timeouts. Budget overruns and engine-level statement aborts come
    /// back as an `Ok` degraded envelope, not an error.
    pub async fn provide<C: ConnectionTrait>(
        &self,
        db: &C,
        source: GridSource,
        catalog: &ColumnCatalog,
    ) -> Result<GridResponse, GridError> {
        let valid = self.request.validate().ok_or(GridError::BadRequest)?;
        let budget = TimeBudget::start(self.time_budget.or(self.config.time_budget));

        let table = source.table().to_owned();
        let resolver = ColumnResolver::new(&table, catalog, &self.aliases, &self.strict);
        let composed = compose::compose(source, &self.request, &resolver);

        if let Some(backend) = self.fulltext.as_deref() {
            if let Some(response) = self.fulltext_provide(backend, &composed, valid).await? {
                return Ok(response);
            }
        }

        let counters =
            count::result_counters(db, &composed, self.simple, self.total_override, &budget).await;
        let (total, filtered) = match counters {
            Ok(counters) => counters,
            Err(GridError::DeadlineExceeded) => return Ok(self.degraded(valid.draw)),
            Err(err) => return Err(err),
        };

        if budget.exceeded() {
            tracing::warn!(draw = valid.draw, "time budget spent after counting, degrading");
            return Ok(self.degraded(valid.draw));
        }

        let fetch = composed.fetch_statement(valid.start, self.page_limit(valid.length));
        let mut statement = StatementBuilder::build(&fetch, &db.get_database_backend());
        budget.attach_hint(&mut statement);

        match db.query_all(statement).await {
            Ok(rows) => {
                let data = rows
                    .iter()
                    .map(|row| row_to_json(row, composed.select_keys()))
                    .collect();
                Ok(GridResponse::page(valid.draw, total, filtered, data))
            }
            Err(err) if crate::errors::is_statement_timeout(&err) => {
                Ok(self.degraded(valid.draw))
            }
            Err(err) => Err(GridError::Database(err)),
        }
    }

    async fn fulltext_provide(
        &self,
        backend: &dyn FulltextBackend,
        composed: &ComposedGrid,
        valid: ValidGrid,
    ) -> Result<Option<GridResponse>, GridError> {
        let Some(page) = backend
            .paginate(composed.statement(), self.page_limit(valid.length), valid.start)
            .await?
        else {
            return Ok(None);
        };

        let (total, filtered) = if self.simple {
            (SIMPLE_PAGINATION_RECORDS, SIMPLE_PAGINATION_RECORDS)
        } else {
            let total = backend.count(&composed.baseline_count_source()).await?;
            let filtered = if composed.search_applied() {
                page.total
            } else {
                total
            };
            (total, filtered)
        };

        Ok(Some(GridResponse::page(valid.draw, total, filtered, page.rows)))
    }

    /// Page size for the fetch; simple mode over-fetches one row so callers
    /// can infer that more pages exist without a count query. A negative
    /// request length means "all rows" and skips the limit.
    fn page_limit(&self, length: i64) -> Option<u64> {
        let length = u64::try_from(length).ok()?;
        Some(if self.simple { length + 1 } else { length })
    }

    fn degraded(&self, draw: i64) -> GridResponse {
        GridResponse::degraded(draw, self.config.timeout_message.clone())
    }
}

/// One fetched row as a JSON object keyed by the composed select list.
///
/// Rows are decoded column by column rather than through the driver-level
/// JSON conversion: expression columns carry no declared type on some
/// drivers and would otherwise be dropped from the row entirely.
fn row_to_json(row: &QueryResult, keys: &[String]) -> JsonValue {
    let mut object = Map::with_capacity(keys.len());
    for key in keys {
        object.insert(key.clone(), json_cell(row, key));
    }
    JsonValue::Object(object)
}

/// Decode cascade for one cell. `try_get` type-checks against the value's
/// runtime type, so a miss falls through to the next candidate; SQL NULL
/// decodes as `Ok(None)` at every step and ends up as JSON null.
fn json_cell(row: &QueryResult, key: &str) -> JsonValue {
    if let Ok(Some(value)) = row.try_get::<Option<i64>>("", key) {
        return value.into();
    }
    if let Ok(Some(value)) = row.try_get::<Option<f64>>("", key) {
        return value.into();
    }
    if let Ok(Some(value)) = row.try_get::<Option<bool>>("", key) {
        return JsonValue::Bool(value);
    }
    if let Ok(Some(value)) = row.try_get::<Option<String>>("", key) {
        return JsonValue::String(value);
    }
    JsonValue::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(draw: i64) -> GridRequest {
        GridRequest {
            draw: Some(draw),
            start: Some(0),
            length: Some(10),
            ..GridRequest::default()
        }
    }

    #[test]
    fn page_limit_respects_simple_mode_and_negative_lengths() {
        let plain = GridProvider::new(request(1));
        assert_eq!(plain.page_limit(10), Some(10));
        assert_eq!(plain.page_limit(-1), None);

        let simple = GridProvider::new(request(1)).simple_pagination();
        assert_eq!(simple.page_limit(10), Some(11));
        assert_eq!(simple.page_limit(-1), None);
    }

    #[test]
    fn compose_rejects_incomplete_requests() {
        let incomplete = GridRequest {
            draw: Some(1),
            start: Some(0),
            length: None,
            ..GridRequest::default()
        };
        let provider = GridProvider::new(incomplete);
        let result = provider.compose(GridSource::new("people"), &ColumnCatalog::default());
        assert!(matches!(result, Err(GridError::BadRequest)));
    }

    #[test]
    fn degraded_uses_configured_message() {
        let provider = GridProvider::new(request(4)).timeout_message("query budget spent");
        let response = provider.degraded(4);
        assert_eq!(response.draw, 4);
        assert_eq!(response.error.as_deref(), Some("query budget spent"));
        assert_eq!(response.records_total, 0);
    }
}
