use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use time::OffsetDateTime;

use crate::app::Model;
use crate::app::model::TrackingState;
use crate::domain::timestamp::{humanize_active_duration, secs_between};
use crate::ui::Component;

const TRACKING_INDICATOR: char = '\u{23f2}'; // ⏲

/// Top bar with the app name, current view, and what is being tracked.
pub struct StatusBar {
    title: &'static str,
    tracking_text: String,
}

impl StatusBar {
    pub fn new(model: &Model, now: OffsetDateTime) -> Self {
        Self {
            title: model.view.title(),
            tracking_text: tracking_text(model, now),
        }
    }
}

impl Component for StatusBar {
    fn render(&self, f: &mut Frame, area: Rect) {
        let version = env!("CARGO_PKG_VERSION");
        let left_text = Span::styled(
            format!(" hours v{version} · {}", self.title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let right_text = format!("{} ", self.tracking_text);
        let left_width = u16::try_from(left_text.width()).unwrap_or(u16::MAX);
        let right_width = u16::try_from(Span::raw(right_text.as_str()).width()).unwrap_or(u16::MAX);
        let padding = area
            .width
            .saturating_sub(left_width.saturating_add(right_width));
        let status_bar = Paragraph::new(Line::from(vec![
            left_text,
            Span::raw(" ".repeat(usize::from(padding))),
            Span::styled(right_text, Style::default().fg(Color::Yellow)),
        ]))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
        f.render_widget(status_bar, area);
    }
}

/// Describes the tracking state for the right side of the bar.
fn tracking_text(model: &Model, now: OffsetDateTime) -> String {
    match &model.tracking {
        TrackingState::Idle => "not tracking".to_string(),
        TrackingState::Starting { .. } => "starting...".to_string(),
        TrackingState::Active(session) => {
            let active_for = humanize_active_duration(secs_between(session.begin, now));
            match model.tracked_task() {
                Some(task) => format!("{TRACKING_INDICATOR} {} · active for {active_for}", task.summary),
                None => format!("{TRACKING_INDICATOR} active for {active_for}"),
            }
        }
    }
}
