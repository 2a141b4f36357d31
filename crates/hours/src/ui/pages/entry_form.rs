use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::model::{COMMENT_CHAR_LIMIT, EntryField, EntryForm};
use crate::domain::input::InputState;
use crate::ui::Page;
use crate::ui::util::input_cursor_position;

/// Begin/end/comment inputs for every log entry form.
pub struct EntryFormPage<'a> {
    form: &'a EntryForm,
    title: &'static str,
}

impl<'a> EntryFormPage<'a> {
    pub fn new(title: &'static str, form: &'a EntryForm) -> Self {
        Self { form, title }
    }

    fn render_input(&self, f: &mut Frame, area: Rect, field: EntryField, input: &InputState) {
        let focused = self.form.focus == field;
        let border_color = if focused { Color::Cyan } else { Color::DarkGray };
        let label = match field {
            EntryField::Begin => " Begin (YYYY/MM/DD HH:MM) ".to_string(),
            EntryField::End => " End (YYYY/MM/DD HH:MM) ".to_string(),
            EntryField::Comment => format!(
                " Comment {}/{COMMENT_CHAR_LIMIT} ",
                input.text().chars().count()
            ),
        };

        let paragraph = Paragraph::new(input.text()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(label),
        );
        f.render_widget(paragraph, area);

        if focused {
            f.set_cursor_position(input_cursor_position(input, area));
        }
    }
}

impl Page for EntryFormPage<'_> {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let fields = self.form.target.fields();
        let mut constraints: Vec<Constraint> = fields
            .iter()
            .map(|field| match field {
                EntryField::Comment => Constraint::Min(5),
                EntryField::Begin | EntryField::End => Constraint::Length(3),
            })
            .collect();
        constraints.push(Constraint::Length(0));
        let chunks = Layout::default()
            .constraints(constraints)
            .margin(1)
            .split(inner);

        for (field, chunk) in fields.iter().zip(chunks.iter()) {
            let input = match field {
                EntryField::Begin => &self.form.begin,
                EntryField::End => &self.form.end,
                EntryField::Comment => &self.form.comment,
            };
            self.render_input(f, *chunk, *field, input);
        }
    }
}
