//! Table renderers behind the `report`, `log`, `stats` and `active`
//! subcommands, plus the pager used by their `--interactive` mode.

use crate::domain::period::DateRange;
use crate::domain::task::TaskStatus;
use crate::infra::db::{Database, DbError};
use crate::report::grid::GridMode;
use crate::report::table::Table;

pub mod active;
pub mod grid;
pub mod interactive;
pub mod log;
pub mod stats;
pub mod table;

/// Which table a reporting subcommand renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordsKind {
    Report,
    AggregatedReport,
    Log,
    Stats,
}

impl RecordsKind {
    /// Loads and lays out the table for `range`.
    ///
    /// # Errors
    /// Returns an error if a query fails.
    pub async fn build(
        self,
        database: &Database,
        range: DateRange,
        task_status: TaskStatus,
    ) -> Result<Table, DbError> {
        match self {
            Self::Report => grid::build(database, range, GridMode::Entries, task_status).await,
            Self::AggregatedReport => {
                grid::build(database, range, GridMode::Aggregated, task_status).await
            }
            Self::Log => log::build(database, range, task_status).await,
            Self::Stats => stats::build(database, Some(range), task_status).await,
        }
    }
}
