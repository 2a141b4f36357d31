use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Command;
use crate::app::model::{EMPTY_SUMMARY_MESSAGE, Model, TaskForm, TaskFormMode, View};
use crate::domain::input::InputState;

/// Handles key input while the task create/edit form is shown.
pub(crate) fn handle(model: &mut Model, key: KeyEvent) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            close(model);

            Vec::new()
        }
        KeyCode::Enter => submit(model),
        KeyCode::Char('s') if ctrl => submit(model),
        _ => {
            edit_input(&mut model.task_form.summary, key);

            Vec::new()
        }
    }
}

fn submit(model: &mut Model) -> Vec<Command> {
    let summary = model.task_form.summary.text().trim().to_string();
    if summary.is_empty() {
        model.set_error(EMPTY_SUMMARY_MESSAGE);

        return Vec::new();
    }

    let command = match model.task_form.mode {
        TaskFormMode::Create => Command::CreateTask { summary },
        TaskFormMode::Update { task_id } => Command::UpdateTaskSummary { task_id, summary },
    };
    close(model);

    vec![command]
}

fn close(model: &mut Model) {
    model.task_form = TaskForm::create();
    model.view = View::TaskList;
}

/// Applies a text editing key to `input`. Returns whether the key was used.
pub(crate) fn edit_input(input: &mut InputState, key: KeyEvent) -> bool {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }

    match key.code {
        KeyCode::Char(ch) => input.insert_char(ch),
        KeyCode::Backspace => input.delete_backward(),
        KeyCode::Delete => input.delete_forward(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => return false,
    }

    true
}
