//! Orchestration of column resolution, predicate application and ordering
//! against the caller's query object.
//!
//! The caller supplies a [`GridSource`]: the physical table name and a
//! `sea_query` select carrying FROM, JOINs, GROUP BY and any base filters.
//! The engine owns the select list. Composition snapshots the pre-search
//! query as the baseline for total counts, then appends one predicate per
//! searched column and at most one order expression. Engine predicates are
//! only ever appended as top-level AND conjuncts against the statement's
//! condition holder, so a caller's OR-combined base filters stay one atomic
//! nested group and are never flattened or reordered.

use crate::models::GridRequest;
use crate::predicate::{self, Clause, Predicate};
use crate::resolve::ColumnResolver;
use sea_orm::sea_query::{
    Alias, ConditionalStatement, Order, OrderedStatement, Query, SelectStatement, SimpleExpr,
};
use std::collections::BTreeSet;

/// The caller's side of one translation call: which table is being served
/// and the base query to build on.
///
/// The query should not carry a select list; the engine derives one from the
/// catalog and alias map. Everything else (joins, grouping, base filters) is
/// passed through untouched.
#[derive(Debug, Clone)]
pub struct GridSource {
    table: String,
    query: SelectStatement,
    grouped: bool,
    hidden: BTreeSet<String>,
}

impl GridSource {
    /// Plain `FROM table` source.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        let table = table.into();
        let query = Query::select().from(Alias::new(table.as_str())).to_owned();
        Self {
            table,
            query,
            grouped: false,
            hidden: BTreeSet::new(),
        }
    }

    /// Source backed by a caller-built query (joins, base filters, grouping).
    #[must_use]
    pub fn with_query(table: impl Into<String>, query: SelectStatement) -> Self {
        Self {
            table: table.into(),
            query,
            grouped: false,
            hidden: BTreeSet::new(),
        }
    }

    /// Declare that the base query carries GROUP BY or HAVING clauses of its
    /// own, so counting wraps it as a derived table.
    #[must_use]
    pub fn grouped(mut self) -> Self {
        self.grouped = true;
        self
    }

    /// Columns the model keeps out of responses; they are dropped from the
    /// select list but remain searchable.
    #[must_use]
    pub fn hide<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden.extend(columns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

/// The outcome of composition: the working query, its pre-search baseline,
/// and the predicates that were appended.
#[derive(Debug, Clone)]
pub struct ComposedGrid {
    table: String,
    baseline: SelectStatement,
    query: SelectStatement,
    grouped: bool,
    predicates: Vec<Predicate>,
    select_keys: Vec<String>,
}

/// Stands in for "no limit" when an offset still has to apply; SQLite
/// rejects a bare OFFSET without a LIMIT clause.
const UNBOUNDED_LIMIT: u64 = u64::MAX >> 1;

/// Translate one request against one source. Never fails: unresolvable
/// columns and malformed order entries degrade to per-column no-ops.
#[must_use]
pub fn compose(source: GridSource, request: &GridRequest, resolver: &ColumnResolver) -> ComposedGrid {
    let GridSource {
        table,
        mut query,
        grouped,
        hidden,
    } = source;

    // Baseline snapshot for total counts. Taken before the select list is
    // prepared; counting replaces the select list with a constant anyway.
    let baseline = query.clone();

    let mut select_keys = Vec::new();
    for name in resolver.select_columns(&hidden) {
        query.column((Alias::new(table.as_str()), Alias::new(name)));
        select_keys.push(name.to_owned());
    }
    for (alias, expression) in resolver.alias_entries() {
        query.expr_as(SimpleExpr::Custom(expression.clone()), Alias::new(alias.as_str()));
        select_keys.push(alias.clone());
    }

    let mut predicates = Vec::new();
    for column in &request.columns {
        let Some(key) = column.data.as_deref() else {
            continue;
        };
        let Some(value) = column.search.as_ref().and_then(|s| s.value.as_deref()) else {
            continue;
        };
        let Some(field) = resolver.resolve(key) else {
            tracing::debug!(column = key, "search column did not resolve, skipping");
            continue;
        };

        let predicate =
            predicate::build(&field, value, resolver.declared_type(key), resolver.is_strict(key));
        match predicate.clause {
            Clause::Where => {
                query.and_where(predicate.expr.clone());
            }
            Clause::Having => {
                query.and_having(predicate.expr.clone());
            }
        }
        predicates.push(predicate);
    }

    apply_order(&mut query, request, resolver);

    ComposedGrid {
        table,
        baseline,
        query,
        grouped,
        predicates,
        select_keys,
    }
}

/// Only the first order entry is honoured; the direction must be exactly
/// `asc` or `desc` and the column must resolve, otherwise the step is
/// skipped entirely.
fn apply_order(query: &mut SelectStatement, request: &GridRequest, resolver: &ColumnResolver) {
    let Some((key, dir)) = request.order_target() else {
        return;
    };
    let direction = match dir {
        "asc" => Order::Asc,
        "desc" => Order::Desc,
        other => {
            tracing::debug!(dir = other, "unsupported order direction, skipping");
            return;
        }
    };
    let Some(field) = resolver.resolve(key) else {
        tracing::debug!(column = key, "order column did not resolve, skipping");
        return;
    };
    query.order_by_expr(SimpleExpr::Custom(field.expr), direction);
}

impl ComposedGrid {
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether any search predicate was actually appended; when none was,
    /// the filtered count can reuse the total and skip a query.
    #[must_use]
    pub fn search_applied(&self) -> bool {
        !self.predicates.is_empty()
    }

    pub(crate) fn baseline_grouped(&self) -> bool {
        self.grouped
    }

    pub(crate) fn filtered_grouped(&self) -> bool {
        self.grouped
            || self
                .predicates
                .iter()
                .any(|predicate| predicate.clause == Clause::Having)
    }

    /// The pre-search query, for total-count purposes.
    #[must_use]
    pub fn baseline_count_source(&self) -> SelectStatement {
        self.baseline.clone()
    }

    /// The baseline plus every appended search predicate, for filtered-count
    /// purposes.
    #[must_use]
    pub fn filtered_count_source(&self) -> SelectStatement {
        let mut source = self.baseline.clone();
        for predicate in &self.predicates {
            match predicate.clause {
                Clause::Where => {
                    source.and_where(predicate.expr.clone());
                }
                Clause::Having => {
                    source.and_having(predicate.expr.clone());
                }
            }
        }
        source
    }

    /// The composed query without pagination, for callers that execute it
    /// themselves.
    #[must_use]
    pub fn statement(&self) -> &SelectStatement {
        &self.query
    }

    /// Select-list keys in statement order: catalog columns first, alias
    /// keys after, the names each fetched row is keyed by.
    #[must_use]
    pub fn select_keys(&self) -> &[String] {
        &self.select_keys
    }

    /// The composed query with offset and, when a page size applies, limit.
    /// An unlimited page with a nonzero offset carries an effectively
    /// unbounded limit instead of a bare OFFSET.
    #[must_use]
    pub fn fetch_statement(&self, start: u64, limit: Option<u64>) -> SelectStatement {
        let mut statement = self.query.clone();
        match limit {
            Some(limit) => {
                statement.limit(limit).offset(start);
            }
            None if start > 0 => {
                statement.limit(UNBOUNDED_LIMIT).offset(start);
            }
            None => {}
        }
        statement
    }
}
