//! Day-column grid behind `hours report`.

use time::{Duration, OffsetDateTime};

use crate::domain::period::DateRange;
use crate::domain::task::TaskStatus;
use crate::domain::timestamp::{format_day_header, humanize_duration};
use crate::infra::db::{Database, DbError};
use crate::report::table::{Cell, Table, accent_for, right_pad_trim};

/// Most entries fetched for a single day column.
const DAY_FETCH_LIMIT: i64 = 100;

/// Width reserved for the time spent inside each cell.
const TIME_BUDGET: usize = 6;

/// What each grid cell stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridMode {
    /// One cell per closed entry.
    Entries,
    /// One cell per task, summing its entries for the day.
    Aggregated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct GridEntry {
    secs_spent: i64,
    summary: String,
}

/// Loads every day of `range` and lays it out as one column per day.
///
/// # Errors
/// Returns an error if any per-day query fails.
pub async fn build(
    database: &Database,
    range: DateRange,
    mode: GridMode,
    task_status: TaskStatus,
) -> Result<Table, DbError> {
    let mut days = Vec::new();
    for day_start in range.day_starts() {
        days.push(fetch_day(database, day_start, mode, task_status).await?);
    }

    Ok(grid_table(&range, &days))
}

async fn fetch_day(
    database: &Database,
    day_start: OffsetDateTime,
    mode: GridMode,
    task_status: TaskStatus,
) -> Result<Vec<GridEntry>, DbError> {
    let day_end = day_start + Duration::days(1);

    let entries = match mode {
        GridMode::Entries => database
            .fetch_log_entries_between(day_start, day_end, task_status, DAY_FETCH_LIMIT)
            .await?
            .into_iter()
            .map(|entry| GridEntry {
                secs_spent: entry.secs_spent,
                summary: entry.task_summary,
            })
            .collect(),
        GridMode::Aggregated => database
            .fetch_report_between(day_start, day_end, task_status, DAY_FETCH_LIMIT)
            .await?
            .into_iter()
            .map(|entry| GridEntry {
                secs_spent: entry.secs_spent,
                summary: entry.task_summary,
            })
            .collect(),
    };

    Ok(entries)
}

/// Narrower summaries for wider grids so a week still fits a typical terminal.
fn summary_budget(num_days: i64) -> usize {
    match num_days {
        7 => 8,
        6 => 10,
        5 => 14,
        _ => 16,
    }
}

fn grid_table(range: &DateRange, days: &[Vec<GridEntry>]) -> Table {
    let summary_budget = summary_budget(range.num_days);
    let mut table = Table::new(range.day_starts().map(format_day_header).collect());

    let row_count = days.iter().map(Vec::len).max().unwrap_or(0).max(1);
    for row_index in 0..row_count {
        let row = days
            .iter()
            .map(|entries| match entries.get(row_index) {
                Some(entry) => Cell::toned(
                    format!(
                        "{}  {}",
                        right_pad_trim(&entry.summary, summary_budget, false),
                        right_pad_trim(&humanize_duration(entry.secs_spent), TIME_BUDGET, false)
                    ),
                    accent_for(&entry.summary),
                ),
                None => Cell::plain(" ".repeat(summary_budget + 2 + TIME_BUDGET)),
            })
            .collect();
        table.push_row(row);
    }

    table.set_footer(
        days.iter()
            .map(|entries| {
                let total: i64 = entries.iter().map(|entry| entry.secs_spent).sum();
                if total == 0 {
                    String::new()
                } else {
                    humanize_duration(total)
                }
            })
            .collect(),
    );

    table
}
