use crossterm::event::{KeyCode, KeyEvent};

use crate::app::Command;
use crate::app::model::{Model, View};

/// Handles key input while choosing the task a log entry moves to.
pub(crate) fn handle(model: &mut Model, key: KeyEvent) -> Vec<Command> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => model.move_targets.select_next(),
        KeyCode::Char('k') | KeyCode::Up => model.move_targets.select_previous(),
        KeyCode::Char('q') | KeyCode::Esc => {
            model.move_request = None;
            model.view = View::TaskLogList;
        }
        KeyCode::Enter => return submit(model),
        _ => {}
    }

    Vec::new()
}

fn submit(model: &mut Model) -> Vec<Command> {
    let (Some(request), Some(target)) = (model.move_request, model.move_targets.selected()) else {
        return Vec::new();
    };
    let command = Command::MoveEntry {
        entry_id: request.entry_id,
        old_task_id: request.old_task_id,
        new_task_id: target.id,
        secs_spent: request.secs_spent,
    };
    model.view = View::TaskLogList;

    vec![command]
}
