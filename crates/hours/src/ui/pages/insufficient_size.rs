use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::model::{MIN_TERMINAL_HEIGHT, MIN_TERMINAL_WIDTH};
use crate::ui::Page;

/// Shown instead of every other view while the terminal is too small.
pub struct InsufficientSizePage {
    height: u16,
    width: u16,
}

impl InsufficientSizePage {
    pub fn new(width: u16, height: u16) -> Self {
        Self { height, width }
    }
}

impl Page for InsufficientSizePage {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(format!(
                "Terminal size {}x{} is too small.",
                self.width, self.height
            )),
            Line::from(format!(
                "hours needs at least {MIN_TERMINAL_WIDTH}x{MIN_TERMINAL_HEIGHT}."
            )),
            Line::from(""),
            Line::from("Press q to quit.").style(Style::default().fg(Color::DarkGray)),
        ];
        let top_padding = area.height.saturating_sub(4) / 2;
        let text_area = Rect::new(
            area.x,
            area.y + top_padding,
            area.width,
            area.height - top_padding,
        );

        f.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            text_area,
        );
    }
}
