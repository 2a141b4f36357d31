use time::OffsetDateTime;

use crate::domain::task::{ActiveTaskDetails, Task, TaskLogEntry};
use crate::infra::db::{DbError, SwitchOutcome};

/// Result of one executed [`crate::app::command::Command`], fed back into the
/// reducer.
///
/// Each variant carries the request parameters the reducer needs to apply the
/// outcome, so handling never depends on the view that issued the command.
#[derive(Debug)]
pub enum Message {
    TasksFetched {
        active: bool,
        result: Result<Vec<Task>, DbError>,
    },
    LogEntriesFetched {
        focus_entry_id: Option<i64>,
        result: Result<Vec<TaskLogEntry>, DbError>,
    },
    ActiveTaskFetched(Result<Option<ActiveTaskDetails>, DbError>),
    TaskRefreshed {
        task_id: i64,
        result: Result<Task, DbError>,
    },
    TaskCreated(Result<Task, DbError>),
    TaskSummaryUpdated {
        task_id: i64,
        summary: String,
        result: Result<(), DbError>,
    },
    TaskActiveStatusUpdated {
        active: bool,
        result: Result<(), DbError>,
    },
    StaleTasksArchived(Result<u64, DbError>),
    TrackingStarted {
        task_id: i64,
        begin: OffsetDateTime,
        result: Result<i64, DbError>,
    },
    TrackingFinished {
        entry_id: i64,
        task_id: i64,
        result: Result<i64, DbError>,
    },
    OpenEntryEdited {
        begin: OffsetDateTime,
        comment: Option<String>,
        result: Result<(), DbError>,
    },
    TrackingSwitched {
        task_id: i64,
        switch_at: OffsetDateTime,
        result: Result<SwitchOutcome, DbError>,
    },
    ManualEntryInserted {
        task_id: i64,
        result: Result<i64, DbError>,
    },
    ClosedEntryEdited {
        entry_id: i64,
        result: Result<i64, DbError>,
    },
    ClosedEntryDeleted(Result<i64, DbError>),
    OpenEntryDeleted(Result<bool, DbError>),
    EntryMoved {
        entry_id: i64,
        result: Result<(), DbError>,
    },
}
