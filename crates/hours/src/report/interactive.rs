//! Full-screen pager that re-renders a report as its window moves.

use std::io;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Row};
use time::{Duration, OffsetDateTime};
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::period::DateRange;
use crate::domain::task::TaskStatus;
use crate::domain::timestamp::{ShiftDirection, format_date, start_of_day, truncate_to_second};
use crate::infra::db::{Database, DbError};
use crate::report::RecordsKind;
use crate::report::table::{Cell, Table, Tone};
use crate::runtime::{event, terminal};

const HELP_LINES: [&str; 5] = [
    " go backwards:      h or <-",
    " go forwards:       l or ->",
    " go to today:       ctrl+t",
    "",
    " press ctrl+c/q to quit",
];

/// Window label and help lines, each with a blank line above.
const HELP_HEIGHT: u16 = 8;

/// Failures while paging through a report.
#[derive(Debug, thiserror::Error)]
pub enum PagerError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// How the pager realigns its window when jumping back to today.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowAnchor {
    /// Monday-Sunday weeks.
    Week,
    /// Windows of the same length ending today.
    Days,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PagerAction {
    Idle,
    Show(DateRange),
    Quit,
}

/// Report settings plus the window currently on screen.
pub struct RecordsPager {
    anchor: WindowAnchor,
    kind: RecordsKind,
    plain: bool,
    range: DateRange,
    table: Table,
    task_status: TaskStatus,
}

impl RecordsPager {
    pub fn new(
        kind: RecordsKind,
        range: DateRange,
        anchor: WindowAnchor,
        task_status: TaskStatus,
        plain: bool,
    ) -> Self {
        Self {
            anchor,
            kind,
            plain,
            range,
            table: Table::default(),
            task_status,
        }
    }

    /// Takes over the terminal until the user quits.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be driven or a fetch fails.
    pub async fn run(mut self, database: &Database, clock: &dyn Clock) -> Result<(), PagerError> {
        self.show(database, self.range).await?;

        let _terminal_guard = terminal::TerminalGuard;
        let mut terminal = terminal::setup_terminal()?;

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        event::spawn_event_reader(event_tx);

        loop {
            terminal.draw(|frame| self.render(frame))?;

            let Some(event) = event_rx.recv().await else {
                break;
            };
            let Event::Key(key) = event else {
                continue;
            };

            match self.handle_key(key, truncate_to_second(clock.now())) {
                PagerAction::Idle => {}
                PagerAction::Show(range) => self.show(database, range).await?,
                PagerAction::Quit => break,
            }
        }

        terminal.show_cursor()?;

        Ok(())
    }

    async fn show(&mut self, database: &Database, range: DateRange) -> Result<(), DbError> {
        debug!(kind = ?self.kind, start = %format_date(range.start), "loading report window");

        self.table = self.kind.build(database, range, self.task_status).await?;
        self.range = range;

        Ok(())
    }

    fn handle_key(&self, key: KeyEvent, now: OffsetDateTime) -> PagerAction {
        if key.kind != KeyEventKind::Press {
            return PagerAction::Idle;
        }

        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if control => PagerAction::Quit,
            KeyCode::Char('t') if control => PagerAction::Show(self.current_window(now)),
            KeyCode::Char('q') | KeyCode::Esc => PagerAction::Quit,
            KeyCode::Char('h') | KeyCode::Left => {
                PagerAction::Show(self.range.shifted(ShiftDirection::Backward))
            }
            KeyCode::Char('l') | KeyCode::Right => {
                PagerAction::Show(self.range.shifted(ShiftDirection::Forward))
            }
            _ => PagerAction::Idle,
        }
    }

    /// Window of the current length that contains today.
    fn current_window(&self, now: OffsetDateTime) -> DateRange {
        let today = start_of_day(now);

        match self.anchor {
            WindowAnchor::Week => {
                let days_since_monday = i64::from(now.weekday().number_days_from_monday());

                DateRange::from_start(today - Duration::days(days_since_monday), 7)
            }
            WindowAnchor::Days => DateRange::from_start(
                today - Duration::days(self.range.num_days - 1),
                self.range.num_days,
            ),
        }
    }

    fn render(&self, frame: &mut Frame) {
        let [table_area, help_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(HELP_HEIGHT),
        ])
        .areas(frame.area());

        frame.render_widget(self.table_widget(), table_area);
        frame.render_widget(Paragraph::new(self.help_text()), help_area);
    }

    fn table_widget(&self) -> ratatui::widgets::Table<'static> {
        let row = |cells: &[Cell]| {
            Row::new(
                cells
                    .iter()
                    .map(|cell| {
                        ratatui::widgets::Cell::from(cell.text.clone())
                            .style(self.tone_style(cell.tone))
                    })
                    .collect::<Vec<_>>(),
            )
        };

        let rows: Vec<Row<'static>> = self.table.rows().iter().map(|cells| row(cells)).collect();
        let widths = vec![Constraint::Fill(1); self.table.headers().len()];
        let border_style = if self.plain {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let mut widget = ratatui::widgets::Table::new(rows, widths)
            .header(row(self.table.headers()).bottom_margin(1))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style),
            );
        if !self.table.footer().is_empty() {
            widget = widget.footer(row(self.table.footer()).top_margin(1));
        }

        widget
    }

    fn help_text(&self) -> Text<'static> {
        let accent = if self.plain {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let mut lines = vec![
            Line::default(),
            Line::styled(self.window_label(), accent),
            Line::default(),
        ];
        lines.extend(HELP_LINES.iter().map(|help| Line::styled(*help, accent)));

        Text::from(lines)
    }

    fn window_label(&self) -> String {
        if self.range.num_days > 1 {
            format!(
                " range:             {}...{}",
                format_date(self.range.start),
                format_date(self.range.end - Duration::days(1))
            )
        } else {
            format!(" date:              {}", format_date(self.range.start))
        }
    }

    fn tone_style(&self, tone: Tone) -> Style {
        if self.plain {
            return Style::default();
        }

        match tone {
            Tone::Plain => Style::default(),
            Tone::Header => Style::default().add_modifier(Modifier::BOLD),
            Tone::Footer => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            Tone::Accent(index) => Style::default().fg(Color::Indexed(index)),
        }
    }
}
