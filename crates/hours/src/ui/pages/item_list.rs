use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem as ListRow, ListState, Paragraph};

use crate::app::list::SelectableList;
use crate::domain::task::ListItem;
use crate::ui::Page;

const ROW_HIGHLIGHT_SYMBOL: &str = "> ";
const TRACKED_MARKER: &str = "\u{23f2} "; // ⏲

/// Two-line rows for any [`ListItem`], with the selected row highlighted and
/// the tracked item marked.
pub struct ItemListPage<'a, T> {
    items: &'a SelectableList<T>,
    title: &'static str,
    tracked_id: Option<i64>,
}

impl<'a, T: ListItem> ItemListPage<'a, T> {
    pub fn new(title: &'static str, items: &'a SelectableList<T>) -> Self {
        Self {
            items,
            title,
            tracked_id: None,
        }
    }

    /// Marks the row whose identity is `tracked_id`.
    pub fn with_tracked(mut self, tracked_id: Option<i64>) -> Self {
        self.tracked_id = tracked_id;

        self
    }
}

impl<T: ListItem> Page for ItemListPage<'_, T> {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title));

        if self.items.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                " Nothing here yet",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            f.render_widget(empty, area);

            return;
        }

        let rows: Vec<ListRow<'_>> = self
            .items
            .items()
            .iter()
            .map(|item| item_row(item, self.tracked_id))
            .collect();
        let list = List::new(rows)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol(ROW_HIGHLIGHT_SYMBOL);
        let mut state = ListState::default().with_selected(self.items.selected_index());

        f.render_stateful_widget(list, area, &mut state);
    }
}

fn item_row<T: ListItem>(item: &T, tracked_id: Option<i64>) -> ListRow<'static> {
    let is_tracked = tracked_id == Some(item.item_id());
    let title_style = if is_tracked {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let marker = if is_tracked { TRACKED_MARKER } else { "" };

    ListRow::new(vec![
        Line::from(Span::styled(format!("{marker}{}", item.title()), title_style)),
        Line::from(Span::styled(
            item.description(),
            Style::default().fg(Color::Gray),
        )),
    ])
}
