use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::model::{SUMMARY_CHAR_LIMIT, TaskForm, TaskFormMode};
use crate::ui::Page;
use crate::ui::util::input_cursor_position;

pub struct TaskFormPage<'a> {
    form: &'a TaskForm,
}

impl<'a> TaskFormPage<'a> {
    pub fn new(form: &'a TaskForm) -> Self {
        Self { form }
    }
}

impl Page for TaskFormPage<'_> {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .margin(1)
            .split(area);
        let title = match self.form.mode {
            TaskFormMode::Create => " New task summary ",
            TaskFormMode::Update { .. } => " Task summary ",
        };
        let counter = format!(
            " {}/{SUMMARY_CHAR_LIMIT} ",
            self.form.summary.text().chars().count()
        );

        let input = Paragraph::new(self.form.summary.text()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title)
                .title_bottom(counter),
        );
        f.render_widget(input, chunks[0]);
        f.set_cursor_position(input_cursor_position(&self.form.summary, chunks[0]));
    }
}
