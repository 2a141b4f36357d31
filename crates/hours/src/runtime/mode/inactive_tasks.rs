use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Command;
use crate::app::model::Model;

/// Handles keys specific to the inactive task list.
pub(crate) fn handle(model: &mut Model, key: KeyEvent) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('d') if ctrl => model
            .inactive_tasks
            .selected()
            .map(|task| {
                vec![Command::SetTaskActive {
                    task_id: task.id,
                    active: true,
                }]
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
