//! Builders shared by the reducer and key handler tests.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::app::model::{ActiveSession, Model, TrackingState};
use crate::domain::task::{Task, TaskLogEntry};

pub(crate) const NOW: OffsetDateTime = datetime!(2024-06-12 18:00 UTC);

pub(crate) const MIN_LOG_SECS: i64 = 60;

pub(crate) fn task(id: i64, summary: &str) -> Task {
    Task {
        active: true,
        created_at: datetime!(2024-06-01 09:00 UTC),
        id,
        secs_spent: 0,
        summary: summary.to_string(),
        updated_at: datetime!(2024-06-10 09:00 UTC),
    }
}

pub(crate) fn entry(id: i64, task_id: i64, secs_spent: i64) -> TaskLogEntry {
    let begin = datetime!(2024-06-12 09:00 UTC);

    TaskLogEntry {
        begin,
        comment: Some(format!("entry {id}")),
        end: begin + time::Duration::seconds(secs_spent),
        id,
        secs_spent,
        task_id,
        task_summary: format!("task {task_id}"),
    }
}

pub(crate) fn session(entry_id: i64, task_id: i64, begin: OffsetDateTime) -> ActiveSession {
    ActiveSession {
        begin,
        comment: None,
        entry_id,
        task_id,
    }
}

/// Model with tasks 1 ("Write report") and 2 ("Review PR") loaded.
pub(crate) fn model() -> Model {
    let mut model = Model::new(MIN_LOG_SECS);
    model
        .tasks
        .replace(vec![task(1, "Write report"), task(2, "Review PR")]);

    model
}

/// [`model`] with task 1 tracked since `begin`.
pub(crate) fn tracking_model(begin: OffsetDateTime) -> Model {
    let mut model = model();
    model.tracking = TrackingState::Active(session(10, 1, begin));

    model
}

pub(crate) fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub(crate) fn char_key(ch: char) -> KeyEvent {
    key(KeyCode::Char(ch))
}

pub(crate) fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

pub(crate) fn shift(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::SHIFT)
}
