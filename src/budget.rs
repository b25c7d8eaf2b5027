//! Wall-clock budget for one translation call.
//!
//! The budget is measured across the counting phase; once it is spent the
//! provider short-circuits to a degraded response instead of executing the
//! page fetch. While budget remains, the remaining time is also embedded
//! into generated statements as a per-statement execution limit, so the
//! database itself aborts individual statements that run long.

use sea_orm::{DatabaseBackend, Statement};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TimeBudget {
    limit: Option<Duration>,
    started: Instant,
}

impl TimeBudget {
    /// Start the clock. `None` means unlimited.
    #[must_use]
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            limit,
            started: Instant::now(),
        }
    }

    #[must_use]
    pub fn unlimited() -> Self {
        Self::start(None)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Remaining budget; `None` when unlimited.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(self.started.elapsed()))
    }

    /// True once the measured phases have consumed the whole budget.
    #[must_use]
    pub fn exceeded(&self) -> bool {
        matches!(self.remaining(), Some(rest) if rest.is_zero())
    }

    /// Embed the remaining time as a MySQL optimizer hint so the engine
    /// aborts the statement on its own. Other backends are left untouched
    /// and rely on the budget bookkeeping alone.
    pub fn attach_hint(&self, statement: &mut Statement) {
        if statement.db_backend != DatabaseBackend::MySql {
            return;
        }
        let Some(remaining) = self.remaining() else {
            return;
        };
        let millis = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);
        if millis == 0 {
            return;
        }
        if let Some(rest) = statement.sql.strip_prefix("SELECT ") {
            statement.sql = format!("SELECT /*+ MAX_EXECUTION_TIME({millis}) */ {rest}");
        }
    }
}
