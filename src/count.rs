//! Row counting for the grid envelope.
//!
//! Counting a grouped query must return the number of grouped rows, not the
//! number of underlying base rows, so grouped sources are wrapped as a
//! derived table with their select list replaced by a constant. Ungrouped
//! sources are counted directly. Simple-pagination mode skips counting
//! entirely and reports a fixed sentinel.

use crate::budget::TimeBudget;
use crate::compose::ComposedGrid;
use crate::errors::GridError;
use sea_orm::sea_query::{Alias, Query, SelectStatement, SimpleExpr};
use sea_orm::{ConnectionTrait, StatementBuilder};

/// Counter value reported for both totals in simple-pagination mode.
pub const SIMPLE_PAGINATION_RECORDS: u64 = 100_000;

/// The statement that counts rows of `source`. Grouped sources become a
/// derived table so COUNT(*) sees one row per group.
pub(crate) fn count_statement(mut source: SelectStatement, grouped: bool) -> SelectStatement {
    if grouped {
        source.expr(SimpleExpr::Custom("0".to_owned()));
        Query::select()
            .expr(SimpleExpr::Custom("COUNT(*)".to_owned()))
            .from_subquery(source, Alias::new("s"))
            .to_owned()
    } else {
        source.expr(SimpleExpr::Custom("COUNT(*)".to_owned()));
        source
    }
}

/// Execute one count, threading the remaining-time hint into the statement.
pub(crate) async fn count_rows<C: ConnectionTrait>(
    db: &C,
    source: SelectStatement,
    grouped: bool,
    budget: &TimeBudget,
) -> Result<u64, GridError> {
    let query = count_statement(source, grouped);
    let mut statement = StatementBuilder::build(&query, &db.get_database_backend());
    budget.attach_hint(&mut statement);

    let row = db.query_one(statement).await.map_err(GridError::from)?;
    let count = match row {
        Some(row) => row.try_get_by_index::<i64>(0).map_err(GridError::from)?,
        None => 0,
    };
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Total and filtered counters for one composed call.
///
/// Standard mode: the total is the caller override when present, otherwise a
/// count of the baseline; the filtered count runs only when a search
/// predicate was actually appended, otherwise it reuses the total.
pub(crate) async fn result_counters<C: ConnectionTrait>(
    db: &C,
    composed: &ComposedGrid,
    simple: bool,
    total_override: Option<u64>,
    budget: &TimeBudget,
) -> Result<(u64, u64), GridError> {
    if simple {
        return Ok((SIMPLE_PAGINATION_RECORDS, SIMPLE_PAGINATION_RECORDS));
    }

    let total = match total_override {
        Some(count) => count,
        None => {
            count_rows(
                db,
                composed.baseline_count_source(),
                composed.baseline_grouped(),
                budget,
            )
            .await?
        }
    };

    let filtered = if composed.search_applied() {
        count_rows(
            db,
            composed.filtered_count_source(),
            composed.filtered_grouped(),
            budget,
        )
        .await?
    } else {
        total
    };

    Ok((total, filtered))
}
