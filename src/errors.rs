//! Error taxonomy for grid translation calls.
//!
//! Only three things can go wrong at this level: the request is missing its
//! required fields, the call outran its time budget (or the database aborted
//! a statement for the same reason), or the data source failed for an
//! unrelated reason. The first two have dedicated handling; the last is
//! propagated unchanged so genuine database errors are never masked.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum GridError {
    /// The request was missing one of `draw`, `start` or `length`; no query
    /// work was performed.
    BadRequest,
    /// The time budget ran out, or the database aborted a statement because
    /// of its per-statement execution limit. Recovered into a degraded
    /// response by the provider; surfaces here only if callers bypass it.
    DeadlineExceeded,
    /// Any other data-source failure, propagated unchanged.
    Database(DbErr),
}

/// Engine-level "statement aborted due to time limit" signals, per backend.
const TIMEOUT_MARKERS: &[&str] = &[
    // MySQL max_execution_time
    "maximum statement execution time exceeded",
    // MySQL kill / timer
    "query execution was interrupted",
    // PostgreSQL statement_timeout
    "statement timeout",
];

/// Whether a database error is the engine aborting a statement over its
/// execution-time limit, as opposed to a genuine failure.
#[must_use]
pub fn is_statement_timeout(err: &DbErr) -> bool {
    let text = err.to_string().to_lowercase();
    TIMEOUT_MARKERS.iter().any(|marker| text.contains(marker))
}

impl From<DbErr> for GridError {
    fn from(err: DbErr) -> Self {
        if is_statement_timeout(&err) {
            Self::DeadlineExceeded
        } else {
            Self::Database(err)
        }
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "draw, start and length are required"),
            Self::DeadlineExceeded => write!(f, "the query exceeded its time budget"),
            Self::Database(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for GridError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::DeadlineExceeded => (StatusCode::GATEWAY_TIMEOUT, self.to_string()),
            Self::Database(err) => {
                tracing::error!(error = ?err, "database error during grid translation");
                // Internal details are logged, never sent to the client.
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_owned(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
