use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::model::View;
use crate::ui::Component;
use crate::ui::util::centered_rect;

const OVERLAY_WIDTH_PERCENT: u16 = 60;
const OVERLAY_HEIGHT_PERCENT: u16 = 80;
const MIN_OVERLAY_SIZE: (u16, u16) = (40, 12);

const GENERAL_BINDINGS: &[(&str, &str)] = &[
    ("1/2/3", "Show tasks, task logs, inactive tasks"),
    ("tab", "Next list"),
    ("shift+tab", "Previous list"),
    ("j/k", "Move selection"),
    ("ctrl+r", "Reload list"),
    ("ctrl+t", "Go to tracked task"),
    ("q/esc", "Go back or quit"),
    ("ctrl+c", "Quit"),
];

const TASK_LIST_BINDINGS: &[(&str, &str)] = &[
    ("a", "Add task"),
    ("u", "Edit task summary"),
    ("s", "Start tracking, or stop and save"),
    ("f", "Stop and save immediately"),
    ("S", "Switch tracking to selected task"),
    ("ctrl+s", "Edit active log, or log time manually"),
    ("ctrl+x", "Discard active log"),
    ("ctrl+d", "Deactivate task"),
    ("A", "Archive tasks idle for two weeks"),
];

const TASK_LOG_BINDINGS: &[(&str, &str)] = &[
    ("u/ctrl+s", "Edit task log"),
    ("ctrl+d", "Delete task log"),
    ("m", "Move task log to another task"),
    ("d/enter", "Show details"),
    ("h/l", "Previous/next in details"),
];

const INACTIVE_BINDINGS: &[(&str, &str)] = &[("ctrl+d", "Reactivate task")];

/// Centered popup listing the keybindings of the view it was opened from.
pub struct HelpOverlay {
    scroll_offset: u16,
    view: View,
}

impl HelpOverlay {
    pub fn new(view: View, scroll_offset: u16) -> Self {
        Self {
            scroll_offset,
            view,
        }
    }

    fn bindings(&self) -> impl Iterator<Item = &'static (&'static str, &'static str)> {
        let specific = match self.view {
            View::TaskList => TASK_LIST_BINDINGS,
            View::TaskLogList | View::TaskLogDetails => TASK_LOG_BINDINGS,
            View::InactiveTaskList => INACTIVE_BINDINGS,
            _ => &[],
        };

        specific.iter().chain(GENERAL_BINDINGS)
    }
}

impl Component for HelpOverlay {
    fn render(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(
            area,
            OVERLAY_WIDTH_PERCENT,
            OVERLAY_HEIGHT_PERCENT,
            MIN_OVERLAY_SIZE,
        );

        f.render_widget(Clear, popup_area);

        let key_width = self.bindings().map(|(key, _)| key.len()).max().unwrap_or(0);
        let mut lines = vec![Line::from("")];
        for (key, description) in self.bindings() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{key:>key_width$}"),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(": ", Style::default().fg(Color::White)),
                Span::styled(*description, Style::default().fg(Color::White)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Press ? / q / Esc to close",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(Span::styled(
                        format!(" {} keys ", self.view.title()),
                        Style::default().fg(Color::Cyan),
                    )),
            )
            .scroll((self.scroll_offset, 0));

        f.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_put_view_keys_before_general_keys() {
        // Arrange
        let overlay = HelpOverlay::new(View::InactiveTaskList, 0);

        // Act
        let keys: Vec<&str> = overlay.bindings().map(|(key, _)| *key).collect();

        // Assert
        assert_eq!(keys.first(), Some(&"ctrl+d"));
        assert_eq!(keys.len(), INACTIVE_BINDINGS.len() + GENERAL_BINDINGS.len());
    }
}
