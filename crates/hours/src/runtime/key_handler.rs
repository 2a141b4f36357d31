use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use time::OffsetDateTime;

use crate::app::model::View;
use crate::app::{App, Command, Model};
use crate::runtime::mode;

/// Routes one key press to the current view and dispatches the resulting
/// commands.
pub(crate) fn handle_key_event(app: &mut App, key: KeyEvent) {
    let now = app.now();
    let commands = handle_key(&mut app.model, key, now);

    app.dispatch(commands);
}

/// Applies one key press to `model` and returns the commands it issues.
pub(crate) fn handle_key(model: &mut Model, key: KeyEvent, now: OffsetDateTime) -> Vec<Command> {
    if key.kind != KeyEventKind::Press {
        return Vec::new();
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        model.should_quit = true;

        return Vec::new();
    }

    model.tick_status();

    match model.view {
        View::InsufficientSize => {
            mode::insufficient_size::handle(model, key);

            Vec::new()
        }
        View::Help => {
            mode::help::handle(model, key);

            Vec::new()
        }
        View::TaskForm => mode::task_form::handle(model, key),
        View::EditOpenEntryForm
        | View::FinishTrackingForm
        | View::ManualEntryForm
        | View::EditClosedEntryForm => mode::entry_form::handle(model, key, now),
        View::MoveTargetPicker => mode::move_target::handle(model, key),
        View::TaskList | View::TaskLogList | View::TaskLogDetails | View::InactiveTaskList => {
            mode::list::handle(model, key, now)
        }
    }
}
