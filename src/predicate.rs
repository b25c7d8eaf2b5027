//! Search predicate construction.
//!
//! One predicate per searched column: an inclusive date range when the value
//! matches the `DD/MM/YYYY - DD/MM/YYYY` shape, exact equality for strict
//! columns and integer/boolean declared types, a `LIKE '%value%'` match
//! otherwise. Values are always bound as parameters, never interpolated into
//! the statement text.

use crate::catalog::DeclaredType;
use crate::resolve::FieldRef;
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, SimpleExpr};

/// Aggregate function names that force a predicate into the HAVING clause.
/// Matching is by case-sensitive substring containment over the resolved
/// field expression, not by word boundary.
pub const AGGREGATE_FUNCTIONS: &[&str] = &[
    "AVG",
    "BIT_AND",
    "BIT_OR",
    "BIT_XOR",
    "COUNT",
    "GROUP_CONCAT",
    "JSON_ARRAYAGG",
    "JSON_OBJECTAGG",
    "MAX",
    "MIN",
    "STD",
    "STDDEV",
    "STDDEV_POP",
    "STDDEV_SAMP",
    "SUM",
    "VAR_POP",
    "VAR_SAMP",
    "VARIANCE",
];

/// Where a predicate attaches: before grouping (WHERE) or after (HAVING).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Where,
    Having,
}

/// A built search predicate, tagged with its target clause.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub clause: Clause,
    pub expr: SimpleExpr,
}

/// Fields whose expression contains an aggregate function name target the
/// post-grouping clause.
#[must_use]
pub fn clause_for(field_expr: &str) -> Clause {
    if AGGREGATE_FUNCTIONS
        .iter()
        .any(|name| field_expr.contains(name))
    {
        Clause::Having
    } else {
        Clause::Where
    }
}

const DATE_RANGE_LEN: usize = 23;
const DATE_RANGE_SEPARATOR: &str = " - ";
const DATE_INPUT_FORMAT: &str = "%d/%m/%Y";
const DATE_SQL_FORMAT: &str = "%Y-%m-%d";

/// A value is a date range iff it is exactly 23 characters shaped
/// `DD/MM/YYYY - DD/MM/YYYY`, both halves parsing as day/month/year.
#[must_use]
pub fn parse_date_range(value: &str) -> Option<(NaiveDate, NaiveDate)> {
    if value.len() != DATE_RANGE_LEN {
        return None;
    }
    if value.get(10..13)? != DATE_RANGE_SEPARATOR {
        return None;
    }
    let from_part = value.get(..10)?;
    let to_part = value.get(13..)?;
    for part in [from_part, to_part] {
        let bytes = part.as_bytes();
        if bytes[2] != b'/' || bytes[5] != b'/' {
            return None;
        }
    }
    let from = NaiveDate::parse_from_str(from_part, DATE_INPUT_FORMAT).ok()?;
    let to = NaiveDate::parse_from_str(to_part, DATE_INPUT_FORMAT).ok()?;
    Some((from, to))
}

/// Build the predicate for one searched column.
#[must_use]
pub fn build(
    field: &FieldRef,
    value: &str,
    declared: Option<DeclaredType>,
    strict: bool,
) -> Predicate {
    let clause = clause_for(&field.expr);

    if let Some((from, to)) = parse_date_range(value) {
        // The upper bound is the end date plus one day so that datetime
        // values anywhere inside the end day fall within the range.
        let upper = to.succ_opt().unwrap_or(to);
        let expr = Expr::cust_with_values(
            format!("{} BETWEEN ? AND ?", field.expr),
            [
                from.format(DATE_SQL_FORMAT).to_string(),
                upper.format(DATE_SQL_FORMAT).to_string(),
            ],
        );
        return Predicate { clause, expr };
    }

    let exact = strict
        || matches!(
            declared,
            Some(DeclaredType::Integer | DeclaredType::Boolean)
        );
    let expr = if exact {
        Expr::cust_with_values(format!("{} = ?", field.expr), [value.to_owned()])
    } else {
        Expr::cust_with_values(format!("{} LIKE ?", field.expr), [format!("%{value}%")])
    };

    Predicate { clause, expr }
}
