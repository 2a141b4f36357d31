use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::app::message::Message;
use crate::app::model::{TASK_LIST_LIMIT, TASK_LOG_LIMIT};
use crate::infra::db::Database;

/// A storage request issued by the reducer and executed off the event loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    FetchTasks {
        active: bool,
    },
    FetchLogEntries {
        focus_entry_id: Option<i64>,
    },
    FetchActiveTask,
    RefreshTask {
        task_id: i64,
    },
    CreateTask {
        summary: String,
    },
    UpdateTaskSummary {
        task_id: i64,
        summary: String,
    },
    SetTaskActive {
        task_id: i64,
        active: bool,
    },
    ArchiveStaleTasks {
        cutoff: OffsetDateTime,
    },
    StartTracking {
        task_id: i64,
        begin: OffsetDateTime,
    },
    FinishTracking {
        entry_id: i64,
        task_id: i64,
        begin: OffsetDateTime,
        end: OffsetDateTime,
        comment: Option<String>,
    },
    EditOpenEntry {
        begin: OffsetDateTime,
        comment: Option<String>,
    },
    QuickSwitch {
        task_id: i64,
        switch_at: OffsetDateTime,
    },
    InsertManualEntry {
        task_id: i64,
        begin: OffsetDateTime,
        end: OffsetDateTime,
        comment: Option<String>,
    },
    EditClosedEntry {
        entry_id: i64,
        begin: OffsetDateTime,
        end: OffsetDateTime,
        comment: Option<String>,
    },
    DeleteClosedEntry {
        entry_id: i64,
    },
    DeleteOpenEntry,
    MoveEntry {
        entry_id: i64,
        old_task_id: i64,
        new_task_id: i64,
        secs_spent: i64,
    },
}

impl Command {
    /// Runs the request against `database` and wraps the outcome.
    ///
    /// Never fails itself; storage errors travel inside the message.
    pub async fn execute(self, database: &Database) -> Message {
        debug!(command = ?self, "executing command");

        let message = match self {
            Self::FetchTasks { active } => Message::TasksFetched {
                active,
                result: database.fetch_tasks(active, TASK_LIST_LIMIT).await,
            },
            Self::FetchLogEntries { focus_entry_id } => Message::LogEntriesFetched {
                focus_entry_id,
                result: database.fetch_log_entries(false, TASK_LOG_LIMIT).await,
            },
            Self::FetchActiveTask => {
                Message::ActiveTaskFetched(database.fetch_active_task_details().await)
            }
            Self::RefreshTask { task_id } => Message::TaskRefreshed {
                task_id,
                result: database.fetch_task(task_id).await,
            },
            Self::CreateTask { summary } => {
                Message::TaskCreated(database.create_task(&summary).await)
            }
            Self::UpdateTaskSummary { task_id, summary } => {
                let result = database.update_task_summary(task_id, &summary).await;

                Message::TaskSummaryUpdated {
                    task_id,
                    summary,
                    result,
                }
            }
            Self::SetTaskActive { task_id, active } => Message::TaskActiveStatusUpdated {
                active,
                result: database.set_task_active(task_id, active).await,
            },
            Self::ArchiveStaleTasks { cutoff } => {
                Message::StaleTasksArchived(database.archive_stale_tasks(cutoff).await)
            }
            Self::StartTracking { task_id, begin } => Message::TrackingStarted {
                task_id,
                begin,
                result: database.start_tracking(task_id, begin).await,
            },
            Self::FinishTracking {
                entry_id,
                task_id,
                begin,
                end,
                comment,
            } => Message::TrackingFinished {
                entry_id,
                task_id,
                result: database
                    .finish_tracking(entry_id, task_id, begin, end, comment.as_deref())
                    .await,
            },
            Self::EditOpenEntry { begin, comment } => {
                let result = database.edit_open_entry(begin, comment.as_deref()).await;

                Message::OpenEntryEdited {
                    begin,
                    comment,
                    result,
                }
            }
            Self::QuickSwitch { task_id, switch_at } => Message::TrackingSwitched {
                task_id,
                switch_at,
                result: database.quick_switch(task_id, switch_at).await,
            },
            Self::InsertManualEntry {
                task_id,
                begin,
                end,
                comment,
            } => Message::ManualEntryInserted {
                task_id,
                result: database
                    .insert_manual_entry(task_id, begin, end, comment.as_deref())
                    .await,
            },
            Self::EditClosedEntry {
                entry_id,
                begin,
                end,
                comment,
            } => Message::ClosedEntryEdited {
                entry_id,
                result: database
                    .edit_closed_entry(entry_id, begin, end, comment.as_deref())
                    .await,
            },
            Self::DeleteClosedEntry { entry_id } => {
                Message::ClosedEntryDeleted(database.delete_closed_entry(entry_id).await)
            }
            Self::DeleteOpenEntry => Message::OpenEntryDeleted(database.delete_open_entry().await),
            Self::MoveEntry {
                entry_id,
                old_task_id,
                new_task_id,
                secs_spent,
            } => Message::EntryMoved {
                entry_id,
                result: database
                    .move_entry(entry_id, old_task_id, new_task_id, secs_spent)
                    .await,
            },
        };

        if let Some(error) = message_error(&message) {
            warn!(%error, "command failed");
        }

        message
    }
}

fn message_error(message: &Message) -> Option<&crate::infra::db::DbError> {
    match message {
        Message::TasksFetched { result, .. } => result.as_ref().err(),
        Message::LogEntriesFetched { result, .. } => result.as_ref().err(),
        Message::ActiveTaskFetched(result) => result.as_ref().err(),
        Message::TaskRefreshed { result, .. } => result.as_ref().err(),
        Message::TaskCreated(result) => result.as_ref().err(),
        Message::TaskSummaryUpdated { result, .. }
        | Message::TaskActiveStatusUpdated { result, .. }
        | Message::OpenEntryEdited { result, .. }
        | Message::EntryMoved { result, .. } => result.as_ref().err(),
        Message::StaleTasksArchived(result) => result.as_ref().err(),
        Message::TrackingStarted { result, .. }
        | Message::TrackingFinished { result, .. }
        | Message::ManualEntryInserted { result, .. }
        | Message::ClosedEntryEdited { result, .. }
        | Message::ClosedEntryDeleted(result) => result.as_ref().err(),
        Message::TrackingSwitched { result, .. } => result.as_ref().err(),
        Message::OpenEntryDeleted(result) => result.as_ref().err(),
    }
}
