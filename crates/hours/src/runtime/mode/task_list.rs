use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use time::{Duration, OffsetDateTime};

use crate::app::Command;
use crate::app::model::{
    DEACTIVATE_TRACKED_MESSAGE, EntryForm, Model, NOTHING_TRACKED_MESSAGE, STALE_TASK_DAYS,
    TOO_SHORT_TO_SAVE_MESSAGE, TaskForm, TrackingState, View,
};
use crate::domain::timestamp::secs_between;

/// Handles keys specific to the active task list.
pub(crate) fn handle(model: &mut Model, key: KeyEvent, now: OffsetDateTime) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('a') if !ctrl => {
            model.task_form = TaskForm::create();
            model.view = View::TaskForm;

            Vec::new()
        }
        KeyCode::Char('u') if !ctrl => {
            if let Some(task) = model.tasks.selected() {
                model.task_form = TaskForm::update(task);
                model.view = View::TaskForm;
            }

            Vec::new()
        }
        KeyCode::Char('s') if ctrl => {
            open_entry_form(model, now);

            Vec::new()
        }
        KeyCode::Char('s') => toggle_tracking(model, now),
        KeyCode::Char('S') => quick_switch(model, now),
        KeyCode::Char('f') if !ctrl => finish_now(model, now),
        KeyCode::Char('x') if ctrl => {
            if model.tracking.session().is_some() {
                vec![Command::DeleteOpenEntry]
            } else {
                model.set_info(NOTHING_TRACKED_MESSAGE);

                Vec::new()
            }
        }
        KeyCode::Char('d') if ctrl => deactivate_selected(model),
        KeyCode::Char('A') => vec![Command::ArchiveStaleTasks {
            cutoff: now - Duration::days(STALE_TASK_DAYS),
        }],
        _ => Vec::new(),
    }
}

/// Starts tracking the selected task, or opens the finish form when
/// something is already tracked.
fn toggle_tracking(model: &mut Model, now: OffsetDateTime) -> Vec<Command> {
    match &model.tracking {
        TrackingState::Idle => start_selected(model, now),
        TrackingState::Active(session) => {
            model.entry_form = EntryForm::finish(session, now);
            model.view = View::FinishTrackingForm;

            Vec::new()
        }
        TrackingState::Starting { .. } => Vec::new(),
    }
}

fn start_selected(model: &mut Model, now: OffsetDateTime) -> Vec<Command> {
    let Some(task_id) = model.tasks.selected().map(|task| task.id) else {
        return Vec::new();
    };
    model.tracking = TrackingState::Starting { task_id };

    vec![Command::StartTracking {
        task_id,
        begin: now,
    }]
}

fn quick_switch(model: &mut Model, now: OffsetDateTime) -> Vec<Command> {
    let Some(task_id) = model.tasks.selected().map(|task| task.id) else {
        return Vec::new();
    };

    match &model.tracking {
        TrackingState::Idle => start_selected(model, now),
        TrackingState::Active(session) if session.task_id != task_id => {
            vec![Command::QuickSwitch {
                task_id,
                switch_at: now,
            }]
        }
        TrackingState::Active(_) | TrackingState::Starting { .. } => Vec::new(),
    }
}

/// Finishes the open entry at `now` with its saved comment.
fn finish_now(model: &mut Model, now: OffsetDateTime) -> Vec<Command> {
    let Some(session) = model.tracking.session() else {
        model.set_info(NOTHING_TRACKED_MESSAGE);

        return Vec::new();
    };

    if secs_between(session.begin, now) < model.min_log_secs {
        model.set_info(TOO_SHORT_TO_SAVE_MESSAGE);

        return Vec::new();
    }

    vec![Command::FinishTracking {
        entry_id: session.entry_id,
        task_id: session.task_id,
        begin: session.begin,
        end: now,
        comment: session.comment.clone(),
    }]
}

/// Edits the open entry, or logs time manually for the selected task when
/// nothing is tracked.
fn open_entry_form(model: &mut Model, now: OffsetDateTime) {
    let form = match &model.tracking {
        TrackingState::Active(session) => EntryForm::edit_open(session),
        TrackingState::Idle | TrackingState::Starting { .. } => {
            let Some(task) = model.tasks.selected() else {
                return;
            };
            EntryForm::manual(task.id, now)
        }
    };

    model.view = form.target.view();
    model.entry_form = form;
}

fn deactivate_selected(model: &mut Model) -> Vec<Command> {
    let Some(task_id) = model.tasks.selected().map(|task| task.id) else {
        return Vec::new();
    };

    if model.tracking.task_id() == Some(task_id) {
        model.set_error(DEACTIVATE_TRACKED_MESSAGE);

        return Vec::new();
    }

    vec![Command::SetTaskActive {
        task_id,
        active: false,
    }]
}
