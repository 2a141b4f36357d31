use crossterm::event::{KeyCode, KeyEvent};

use crate::app::Model;

/// Handles key input while the help overlay is shown.
pub(crate) fn handle(model: &mut Model, key: KeyEvent) {
    match key.code {
        KeyCode::Char('?' | 'q') | KeyCode::Esc => {
            model.view = model.last_view;
            model.help_scroll = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            model.help_scroll = model.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            model.help_scroll = model.help_scroll.saturating_sub(1);
        }
        _ => {}
    }
}
