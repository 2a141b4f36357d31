use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::app::model::{StatusKind, StatusMessage, View};
use crate::ui::Component;

/// Bottom bar showing the transient status message, or key hints for the
/// current view when there is none.
pub struct FooterBar {
    hints: &'static str,
    status: Option<StatusMessage>,
}

impl FooterBar {
    pub fn new(model: &Model) -> Self {
        Self {
            hints: view_hints(model.view),
            status: model.status.clone(),
        }
    }
}

impl Component for FooterBar {
    fn render(&self, f: &mut Frame, area: Rect) {
        let text = match &self.status {
            Some(status) => {
                let color = match status.kind {
                    StatusKind::Info => Color::Green,
                    StatusKind::Error => Color::LightRed,
                };
                Span::styled(
                    format!(" {}", status.text),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )
            }
            None => Span::styled(
                format!(" {}", self.hints),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::DIM),
            ),
        };

        let footer =
            Paragraph::new(text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
        f.render_widget(footer, area);
    }
}

fn view_hints(view: View) -> &'static str {
    match view {
        View::TaskList => {
            "a: add · u: edit · s: start/stop · S: switch · ctrl+s: log time · ?: help · q: quit"
        }
        View::TaskLogList => "u: edit · ctrl+d: delete · m: move · d: details · ?: help · q: back",
        View::TaskLogDetails => "h/l: previous/next · d/q: back",
        View::InactiveTaskList => "ctrl+d: reactivate · ?: help · q: back",
        View::TaskForm => "enter: save · esc: cancel",
        View::EditOpenEntryForm
        | View::FinishTrackingForm
        | View::ManualEntryForm
        | View::EditClosedEntryForm => {
            "tab: next field · j/k J/K h/l: adjust time · ctrl+s: save · esc: cancel"
        }
        View::MoveTargetPicker => "enter: move here · esc: cancel",
        View::Help => "?/q/esc: close",
        View::InsufficientSize => "q: quit",
    }
}
