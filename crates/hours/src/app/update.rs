//! Pure reduction of storage results and terminal resizes into [`Model`].
//!
//! Nothing here performs IO. Follow-up work is returned as [`Command`]s for
//! the caller to dispatch.

use tracing::debug;

use crate::app::command::Command;
use crate::app::message::Message;
use crate::app::model::{
    ActiveSession, MIN_TERMINAL_HEIGHT, MIN_TERMINAL_WIDTH, Model, NOTHING_TRACKED_MESSAGE,
    TrackingState, View,
};
use crate::infra::db::DbError;

/// Appended to storage failures shown in the footer.
const STORAGE_ERROR_HINT: &str = "restart hours, and report the issue if it keeps happening";

/// Commands issued once when the interactive views start.
pub fn init_commands() -> Vec<Command> {
    vec![
        Command::FetchTasks { active: true },
        Command::FetchLogEntries {
            focus_entry_id: None,
        },
        Command::FetchTasks { active: false },
    ]
}

/// Switches to the insufficient-size view when the terminal shrinks below the
/// minimum and restores the remembered view once it grows back.
pub fn handle_resize(model: &mut Model, width: u16, height: u16) {
    let too_small = width < MIN_TERMINAL_WIDTH || height < MIN_TERMINAL_HEIGHT;

    match (too_small, model.view == View::InsufficientSize) {
        (true, false) => {
            model.view_before_resize = model.view;
            model.view = View::InsufficientSize;
        }
        (false, true) => model.view = model.view_before_resize,
        _ => {}
    }
}

/// Applies one storage result to `model`.
///
/// Returns the follow-up commands the result calls for.
pub fn handle_message(model: &mut Model, message: Message) -> Vec<Command> {
    match message {
        Message::TasksFetched { active, result } => match result {
            Ok(tasks) if active => {
                model.tasks.replace(tasks);

                vec![Command::FetchActiveTask]
            }
            Ok(tasks) => {
                model.inactive_tasks.replace(tasks);

                Vec::new()
            }
            Err(error) => report_error(model, "loading tasks", &error),
        },
        Message::LogEntriesFetched {
            focus_entry_id,
            result,
        } => match result {
            Ok(entries) => {
                match focus_entry_id {
                    Some(entry_id) => model.log_entries.replace_focusing(entries, Some(entry_id)),
                    None => model.log_entries.replace(entries),
                }
                if model.view == View::TaskLogDetails && model.log_entries.is_empty() {
                    model.view = View::TaskLogList;
                }

                Vec::new()
            }
            Err(error) => report_error(model, "loading task logs", &error),
        },
        Message::ActiveTaskFetched(result) => match result {
            Ok(details) => {
                apply_active_task(model, details.map(ActiveSession::from));

                Vec::new()
            }
            Err(error) => report_error(model, "loading the active task", &error),
        },
        Message::TaskRefreshed { task_id, result } => match result {
            Ok(task) => {
                model.tasks.update_item(task.clone());
                model.inactive_tasks.update_item(task);

                Vec::new()
            }
            Err(error) => {
                debug!(task_id, "refreshed task is gone");

                report_error(model, "refreshing task", &error)
            }
        },
        Message::TaskCreated(result) => match result {
            Ok(task) => {
                model.tasks.prepend(task);

                Vec::new()
            }
            Err(error) => report_error(model, "creating task", &error),
        },
        Message::TaskSummaryUpdated {
            task_id,
            summary,
            result,
        } => match result {
            Ok(()) => {
                model.tasks.update_by_id(task_id, |task| task.summary = summary);

                vec![
                    Command::RefreshTask { task_id },
                    Command::FetchLogEntries {
                        focus_entry_id: None,
                    },
                ]
            }
            Err(error) => report_error(model, "updating task", &error),
        },
        Message::TaskActiveStatusUpdated { active, result } => match result {
            Ok(()) => {
                model.set_info(if active {
                    "Task reactivated"
                } else {
                    "Task deactivated"
                });

                refetch_task_lists()
            }
            Err(error) => report_error(model, "changing task status", &error),
        },
        Message::StaleTasksArchived(result) => match result {
            Ok(archived) => {
                model.set_info(format!("Archived {archived} tasks"));

                refetch_task_lists()
            }
            Err(error) => report_error(model, "archiving tasks", &error),
        },
        Message::TrackingStarted {
            task_id,
            begin,
            result,
        } => match result {
            Ok(entry_id) => {
                model.tracking = TrackingState::Active(ActiveSession {
                    begin,
                    comment: None,
                    entry_id,
                    task_id,
                });

                Vec::new()
            }
            Err(error) => {
                model.tracking = TrackingState::Idle;
                let mut commands = report_error(model, "starting tracking", &error);
                if matches!(error, DbError::AlreadyTracking) {
                    commands.push(Command::FetchActiveTask);
                }

                commands
            }
        },
        Message::TrackingFinished {
            entry_id,
            task_id,
            result,
        } => match result {
            Ok(_) => {
                model.tracking = TrackingState::Idle;

                refresh_after_entry_change(task_id, Some(entry_id))
            }
            Err(error) => report_error(model, "saving task log", &error),
        },
        Message::OpenEntryEdited {
            begin,
            comment,
            result,
        } => match result {
            Ok(()) => {
                if let TrackingState::Active(session) = &mut model.tracking {
                    session.begin = begin;
                    session.comment = comment;
                }

                Vec::new()
            }
            Err(error) => {
                let commands = report_error(model, "updating the active task log", &error);
                if matches!(error, DbError::NoTaskActive) {
                    model.tracking = TrackingState::Idle;
                }

                commands
            }
        },
        Message::TrackingSwitched {
            task_id,
            switch_at,
            result,
        } => match result {
            Ok(outcome) => {
                model.tracking = TrackingState::Active(ActiveSession {
                    begin: switch_at,
                    comment: None,
                    entry_id: outcome.new_entry_id,
                    task_id,
                });

                refresh_after_entry_change(
                    outcome.previous_task_id,
                    Some(outcome.finished_entry_id),
                )
            }
            Err(error) => {
                let mut commands = report_error(model, "switching tracking", &error);
                if matches!(error, DbError::NoTaskActive) {
                    model.tracking = TrackingState::Idle;
                    commands.push(Command::FetchActiveTask);
                }

                commands
            }
        },
        Message::ManualEntryInserted { task_id, result } => match result {
            Ok(entry_id) => refresh_after_entry_change(task_id, Some(entry_id)),
            Err(error) => report_error(model, "saving task log", &error),
        },
        Message::ClosedEntryEdited { entry_id, result } => match result {
            Ok(task_id) => refresh_after_entry_change(task_id, Some(entry_id)),
            Err(error) => report_error(model, "updating task log", &error),
        },
        Message::ClosedEntryDeleted(result) => match result {
            Ok(task_id) => refresh_after_entry_change(task_id, None),
            Err(error) => report_error(model, "deleting task log", &error),
        },
        Message::OpenEntryDeleted(result) => match result {
            Ok(deleted) => {
                model.tracking = TrackingState::Idle;
                if deleted {
                    model.set_info("Discarded the active task log");
                } else {
                    model.set_info(NOTHING_TRACKED_MESSAGE);
                }

                Vec::new()
            }
            Err(error) => report_error(model, "discarding the active task log", &error),
        },
        Message::EntryMoved { entry_id, result } => match result {
            Ok(()) => {
                model.move_request = None;
                if model.view == View::MoveTargetPicker {
                    model.view = View::TaskLogList;
                }

                let mut commands = vec![Command::FetchLogEntries {
                    focus_entry_id: Some(entry_id),
                }];
                commands.extend(refetch_task_lists());

                commands
            }
            Err(error) => report_error(model, "moving task log", &error),
        },
    }
}

/// Replaces the tracking state with what storage reports.
///
/// A start still in flight is kept so a stale fetch cannot clear it.
fn apply_active_task(model: &mut Model, session: Option<ActiveSession>) {
    match session {
        Some(session) => {
            if model.focus_tracked_on_load {
                model.tasks.select_id(session.task_id);
            }
            model.tracking = TrackingState::Active(session);
        }
        None => {
            if !matches!(model.tracking, TrackingState::Starting { .. }) {
                model.tracking = TrackingState::Idle;
            }
        }
    }

    model.focus_tracked_on_load = false;
}

fn refresh_after_entry_change(task_id: i64, focus_entry_id: Option<i64>) -> Vec<Command> {
    vec![
        Command::RefreshTask { task_id },
        Command::FetchLogEntries { focus_entry_id },
    ]
}

fn refetch_task_lists() -> Vec<Command> {
    vec![
        Command::FetchTasks { active: true },
        Command::FetchTasks { active: false },
    ]
}

/// Shows `error` in the footer and returns the re-fetches it calls for.
fn report_error(model: &mut Model, action: &str, error: &DbError) -> Vec<Command> {
    if error.is_storage_failure() {
        model.set_error(format!("Error {action}: {error}; {STORAGE_ERROR_HINT}"));

        return Vec::new();
    }

    model.set_error(format!("Error {action}: {error}"));
    if error.is_stale() {
        return vec![
            Command::FetchTasks { active: true },
            Command::FetchLogEntries {
                focus_entry_id: None,
            },
        ];
    }

    Vec::new()
}
