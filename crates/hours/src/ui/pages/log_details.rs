use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::domain::task::TaskLogEntry;
use crate::domain::timestamp::{format_timestamp, humanize_duration};
use crate::ui::Page;

/// Full view of one closed entry, including its whole comment.
pub struct LogDetailsPage<'a> {
    entry: Option<&'a TaskLogEntry>,
}

impl<'a> LogDetailsPage<'a> {
    pub fn new(entry: Option<&'a TaskLogEntry>) -> Self {
        Self { entry }
    }
}

impl Page for LogDetailsPage<'_> {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Task Log Details ");
        let lines = self.entry.map(detail_lines).unwrap_or_default();

        f.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false }),
            area,
        );
    }
}

fn detail_lines(entry: &TaskLogEntry) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {label:<9}"), label_style),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        field("Task", entry.task_summary.clone()),
        field("Begin", format_timestamp(entry.begin)),
        field("End", format_timestamp(entry.end)),
        field("Spent", humanize_duration(entry.secs_spent)),
        Line::from(""),
        Line::from(Span::styled(" Comment", label_style)),
    ];
    lines.extend(
        entry
            .comment_or_placeholder()
            .lines()
            .map(|line| Line::from(format!(" {line}"))),
    );

    lines
}
