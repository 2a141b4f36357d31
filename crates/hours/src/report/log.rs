//! Entry listing behind `hours log`.

use time::OffsetDateTime;

use crate::domain::period::DateRange;
use crate::domain::task::{TaskLogEntry, TaskStatus};
use crate::domain::timestamp::{
    format_date, format_time_of_day, format_timestamp, humanize_duration,
};
use crate::infra::db::{Database, DbError};
use crate::report::table::{Cell, Table, accent_for, right_pad_trim, single_line};

const LOG_FETCH_LIMIT: i64 = 1000;
const SUMMARY_BUDGET: usize = 20;
const COMMENT_BUDGET: usize = 40;

/// Loads the closed entries that ended inside `range`, oldest first.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn build(
    database: &Database,
    range: DateRange,
    task_status: TaskStatus,
) -> Result<Table, DbError> {
    let entries = database
        .fetch_log_entries_between(range.start, range.end, task_status, LOG_FETCH_LIMIT)
        .await?;

    Ok(log_table(&entries))
}

fn log_table(entries: &[TaskLogEntry]) -> Table {
    let mut table = Table::new(
        ["#", "Task", "Comment", "Duration", "TimeSpent"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    );

    for (index, entry) in entries.iter().enumerate() {
        let tone = accent_for(&entry.task_summary);
        table.push_row(vec![
            Cell::plain((index + 1).to_string()),
            Cell::toned(
                right_pad_trim(&entry.task_summary, SUMMARY_BUDGET, true),
                tone,
            ),
            Cell::toned(
                right_pad_trim(
                    &single_line(entry.comment.as_deref().unwrap_or_default()),
                    COMMENT_BUDGET,
                    true,
                ),
                tone,
            ),
            Cell::toned(time_range(entry.begin, entry.end), tone),
            Cell::toned(humanize_duration(entry.secs_spent), tone),
        ]);
    }

    let total: i64 = entries.iter().map(|entry| entry.secs_spent).sum();
    table.set_footer(vec![
        String::new(),
        "Total".to_string(),
        String::new(),
        String::new(),
        humanize_duration(total),
    ]);

    table
}

/// Shows only the times when the entry starts and ends on the same day.
fn time_range(begin: OffsetDateTime, end: OffsetDateTime) -> String {
    if format_date(begin) == format_date(end) {
        format!("{} ... {}", format_time_of_day(begin), format_time_of_day(end))
    } else {
        format!("{} ... {}", format_timestamp(begin), format_timestamp(end))
    }
}
