use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Command;
use crate::app::model::{EntryForm, Model, MoveRequest, NO_MOVE_TARGETS_MESSAGE, View};

/// Handles keys specific to the task log list.
pub(crate) fn handle(model: &mut Model, key: KeyEvent) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let Some(entry_id) = model.log_entries.selected().map(|entry| entry.id) else {
        return Vec::new();
    };

    match key.code {
        KeyCode::Char('u') if !ctrl => edit_entry(model),
        KeyCode::Char('s') if ctrl => edit_entry(model),
        KeyCode::Char('d') if ctrl => {
            return vec![Command::DeleteClosedEntry { entry_id }];
        }
        KeyCode::Char('d') | KeyCode::Enter => model.view = View::TaskLogDetails,
        KeyCode::Char('m') => open_move_picker(model),
        _ => {}
    }

    Vec::new()
}

/// Handles keys while one entry's details are shown.
pub(crate) fn handle_details(model: &mut Model, key: KeyEvent) -> Vec<Command> {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => model.log_entries.select_previous(),
        KeyCode::Char('l') | KeyCode::Right => model.log_entries.select_next(),
        KeyCode::Char('d') => model.view = View::TaskLogList,
        _ => {}
    }

    Vec::new()
}

fn edit_entry(model: &mut Model) {
    if let Some(entry) = model.log_entries.selected() {
        model.entry_form = EntryForm::edit_closed(entry);
        model.view = View::EditClosedEntryForm;
    }
}

/// Offers every other active task as the new owner of the selected entry.
fn open_move_picker(model: &mut Model) {
    let Some(entry) = model.log_entries.selected() else {
        return;
    };
    let request = MoveRequest {
        entry_id: entry.id,
        old_task_id: entry.task_id,
        secs_spent: entry.secs_spent,
    };
    let targets: Vec<_> = model
        .tasks
        .items()
        .iter()
        .filter(|task| task.id != request.old_task_id)
        .cloned()
        .collect();

    if targets.is_empty() {
        model.set_error(NO_MOVE_TARGETS_MESSAGE);

        return;
    }

    model.move_targets.replace_focusing(targets, None);
    model.move_targets.select_first();
    model.move_request = Some(request);
    model.view = View::MoveTargetPicker;
}
