use crossterm::event::{KeyCode, KeyEvent};

use crate::app::Model;

/// Only quitting is possible until the terminal grows back.
pub(crate) fn handle(model: &mut Model, key: KeyEvent) {
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
        model.should_quit = true;
    }
}
