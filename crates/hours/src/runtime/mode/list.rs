use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use time::OffsetDateTime;

use crate::app::Command;
use crate::app::model::{Model, NOTHING_TRACKED_MESSAGE, View};
use crate::runtime::mode::{inactive_tasks, task_list, task_log};

/// Handles key input shared by the list views, then delegates to the view
/// the key belongs to.
pub(crate) fn handle(model: &mut Model, key: KeyEvent, now: OffsetDateTime) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('1') if !ctrl => model.view = View::TaskList,
        KeyCode::Char('2') if !ctrl => model.view = View::TaskLogList,
        KeyCode::Char('3') if !ctrl => model.view = View::InactiveTaskList,
        KeyCode::Tab => cycle_list(model, true),
        KeyCode::BackTab => cycle_list(model, false),
        KeyCode::Char('r') if ctrl => return reload(model),
        KeyCode::Char('t') if ctrl => jump_to_tracked(model),
        KeyCode::Char('?') => {
            model.last_view = model.view;
            model.help_scroll = 0;
            model.view = View::Help;
        }
        KeyCode::Char('q') | KeyCode::Esc => go_back(model),
        KeyCode::Char('j') | KeyCode::Down if model.view != View::TaskLogDetails => {
            select_next(model);
        }
        KeyCode::Char('k') | KeyCode::Up if model.view != View::TaskLogDetails => {
            select_previous(model);
        }
        _ => {
            return match model.view {
                View::TaskList => task_list::handle(model, key, now),
                View::TaskLogList => task_log::handle(model, key),
                View::TaskLogDetails => task_log::handle_details(model, key),
                View::InactiveTaskList => inactive_tasks::handle(model, key),
                _ => Vec::new(),
            };
        }
    }

    Vec::new()
}

fn cycle_list(model: &mut Model, forward: bool) {
    let current = match model.view {
        View::TaskLogDetails => View::TaskLogList,
        view => view,
    };
    let position = View::LISTS
        .iter()
        .position(|view| *view == current)
        .unwrap_or(0);
    let count = View::LISTS.len();
    let next = if forward {
        (position + 1) % count
    } else {
        (position + count - 1) % count
    };

    model.view = View::LISTS[next];
}

fn reload(model: &Model) -> Vec<Command> {
    match model.view {
        View::TaskLogList | View::TaskLogDetails => vec![Command::FetchLogEntries {
            focus_entry_id: None,
        }],
        View::InactiveTaskList => vec![Command::FetchTasks { active: false }],
        _ => vec![Command::FetchTasks { active: true }],
    }
}

fn jump_to_tracked(model: &mut Model) {
    match model.tracking.task_id() {
        Some(task_id) => {
            model.view = View::TaskList;
            model.tasks.select_id(task_id);
        }
        None => model.set_info(NOTHING_TRACKED_MESSAGE),
    }
}

fn go_back(model: &mut Model) {
    model.view = match model.view {
        View::TaskList => {
            model.should_quit = true;

            return;
        }
        View::TaskLogDetails => View::TaskLogList,
        _ => View::TaskList,
    };
}

fn select_next(model: &mut Model) {
    match model.view {
        View::TaskList => model.tasks.select_next(),
        View::TaskLogList => model.log_entries.select_next(),
        View::InactiveTaskList => model.inactive_tasks.select_next(),
        _ => {}
    }
}

fn select_previous(model: &mut Model) {
    match model.view {
        View::TaskList => model.tasks.select_previous(),
        View::TaskLogList => model.log_entries.select_previous(),
        View::InactiveTaskList => model.inactive_tasks.select_previous(),
        _ => {}
    }
}
