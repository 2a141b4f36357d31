//! Per-task totals behind `hours stats`.

use crate::domain::period::DateRange;
use crate::domain::task::{TaskReportEntry, TaskStatus};
use crate::domain::timestamp::humanize_duration;
use crate::infra::db::{Database, DbError};
use crate::report::table::{Cell, Table, accent_for, right_pad_trim};

const STATS_FETCH_LIMIT: i64 = 1000;
const SUMMARY_BUDGET: usize = 50;

/// Aggregates closed entries per task, over `range` or over everything when it
/// is `None`.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn build(
    database: &Database,
    range: Option<DateRange>,
    task_status: TaskStatus,
) -> Result<Table, DbError> {
    let entries = match range {
        Some(range) => {
            database
                .fetch_stats_between(range.start, range.end, task_status, STATS_FETCH_LIMIT)
                .await?
        }
        None => database.fetch_stats(task_status, STATS_FETCH_LIMIT).await?,
    };

    Ok(stats_table(&entries))
}

fn stats_table(entries: &[TaskReportEntry]) -> Table {
    let mut table = Table::new(vec![
        "Task".to_string(),
        "#LogEntries".to_string(),
        "TimeSpent".to_string(),
    ]);

    for entry in entries {
        let tone = accent_for(&entry.task_summary);
        table.push_row(vec![
            Cell::toned(right_pad_trim(&entry.task_summary, SUMMARY_BUDGET, true), tone),
            Cell::toned(entry.num_entries.to_string(), tone),
            Cell::toned(humanize_duration(entry.secs_spent), tone),
        ]);
    }

    let total_entries: i64 = entries.iter().map(|entry| entry.num_entries).sum();
    let total_secs: i64 = entries.iter().map(|entry| entry.secs_spent).sum();
    table.set_footer(vec![
        "Total".to_string(),
        total_entries.to_string(),
        humanize_duration(total_secs),
    ]);

    table
}
