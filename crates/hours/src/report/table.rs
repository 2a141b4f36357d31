//! Tables shared by the `report`, `log` and `stats` renderers.
//!
//! A [`Table`] keeps its cells together with their [`Tone`], so the same rows
//! can be printed through `comfy-table` or drawn by the interactive pager.

use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{Attribute, CellAlignment, Color, ContentArrangement};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// 256-color indices used to tell tasks apart in styled output.
const ACCENT_PALETTE: [u8; 12] = [
    39, 41, 75, 79, 105, 111, 141, 150, 173, 179, 204, 214,
];

const ELLIPSIS: &str = "...";

/// Visual role of a piece of table text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Plain,
    Header,
    Footer,
    /// Per-task color, holding a 256-color index.
    Accent(u8),
}

impl Tone {
    fn style(self, cell: comfy_table::Cell) -> comfy_table::Cell {
        match self {
            Self::Plain => cell,
            Self::Header => cell.add_attribute(Attribute::Bold),
            Self::Footer => cell.fg(Color::Yellow).add_attribute(Attribute::Bold),
            Self::Accent(index) => cell.fg(Color::AnsiValue(index)),
        }
    }
}

/// Picks a stable accent color for `key`, so one task keeps its color across
/// every column of a grid.
pub fn accent_for(key: &str) -> Tone {
    let hash = key.bytes().fold(0usize, |hash, byte| {
        hash.wrapping_mul(31).wrapping_add(usize::from(byte))
    });

    Tone::Accent(ACCENT_PALETTE[hash % ACCENT_PALETTE.len()])
}

/// One table cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::toned(text, Tone::Plain)
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn to_comfy(&self, plain: bool, alignment: CellAlignment) -> comfy_table::Cell {
        let cell = comfy_table::Cell::new(&self.text).set_alignment(alignment);
        if plain { cell } else { self.tone.style(cell) }
    }
}

/// Header, body rows and an optional totals footer.
///
/// Header and footer cells are centered; body cells are left-aligned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    footer: Vec<Cell>,
    headers: Vec<Cell>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers: headers
                .into_iter()
                .map(|header| Cell::toned(header, Tone::Header))
                .collect(),
            ..Self::default()
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn set_footer(&mut self, footer: Vec<String>) {
        self.footer = footer
            .into_iter()
            .map(|cell| Cell::toned(cell, Tone::Footer))
            .collect();
    }

    pub fn headers(&self) -> &[Cell] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn footer(&self) -> &[Cell] {
        &self.footer
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Renders the table for a terminal or a pipe.
    ///
    /// `plain` output uses ASCII borders and no escape codes. Otherwise the
    /// table is drawn with box characters and colored even when piped.
    pub fn render(&self, plain: bool) -> String {
        let mut table = comfy_table::Table::new();
        if plain {
            table.load_preset(ASCII_FULL).force_no_tty();
        } else {
            table.load_preset(UTF8_FULL).enforce_styling();
        }
        table.set_content_arrangement(ContentArrangement::Dynamic);

        if !self.headers.is_empty() {
            table.set_header(
                self.headers
                    .iter()
                    .map(|cell| cell.to_comfy(plain, CellAlignment::Center)),
            );
        }
        for row in &self.rows {
            table.add_row(row.iter().map(|cell| cell.to_comfy(plain, CellAlignment::Left)));
        }
        if !self.footer.is_empty() {
            table.add_row(
                self.footer
                    .iter()
                    .map(|cell| cell.to_comfy(plain, CellAlignment::Center)),
            );
        }

        format!("{table}\n")
    }
}

/// Fits `text` into exactly `width` terminal columns, padding with spaces or
/// cutting it short. With `ellipsis`, cut text ends in `...`.
pub fn right_pad_trim(text: &str, width: usize, ellipsis: bool) -> String {
    let text_width = text.width();
    if text_width <= width {
        return format!("{text}{}", " ".repeat(width - text_width));
    }

    let marker = if ellipsis && width > ELLIPSIS.len() {
        ELLIPSIS
    } else {
        ""
    };
    let budget = width - marker.len();

    let mut fitted = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        fitted.push(ch);
        used += ch_width;
    }
    fitted.push_str(marker);
    fitted.push_str(&" ".repeat(budget - used));

    fitted
}

/// Collapses multi-line text onto one line for a table cell.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_lays_out_header_rows_and_footer() {
        // Arrange
        let mut table = Table::new(vec!["Task".to_string(), "Spent".to_string()]);
        table.push_row(vec![Cell::plain("Write"), Cell::plain("1h")]);
        table.set_footer(vec!["Total".to_string(), "1h".to_string()]);

        // Act
        let output = table.render(true);

        // Assert
        let lines: Vec<&str> = output.lines().collect();
        let write_line = lines
            .iter()
            .position(|line| *line == "| Write | 1h    |")
            .expect("missing body row");
        let total_line = lines
            .iter()
            .position(|line| line.contains("Total"))
            .expect("missing footer row");
        assert!(lines[0].starts_with('+'));
        assert!(lines[1].contains("Task"));
        assert!(write_line < total_line);
        assert!(output.ends_with("+\n"));
    }

    #[test]
    fn test_render_plain_is_ascii_only() {
        // Arrange
        let mut table = Table::new(vec!["Task".to_string()]);
        table.push_row(vec![Cell::toned("Write", accent_for("Write"))]);
        table.set_footer(vec!["1h".to_string()]);

        // Act
        let output = table.render(true);

        // Assert
        assert!(output.is_ascii());
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_render_styled_wraps_text_in_escape_codes() {
        // Arrange
        let mut table = Table::new(vec!["Task".to_string()]);
        table.push_row(vec![Cell::toned("Write", accent_for("Write"))]);

        // Act
        let styled = table.render(false);
        let plain = table.render(true);

        // Assert
        assert!(styled.contains('\u{1b}'));
        assert!(!plain.contains('\u{1b}'));
        assert!(styled.contains("Write"));
    }

    #[test]
    fn test_short_rows_are_padded_to_column_count() {
        // Arrange
        let mut table = Table::new(vec!["A".to_string(), "B".to_string()]);
        table.push_row(vec![Cell::plain("x")]);

        // Act
        let output = table.render(true);

        // Assert
        assert!(output.lines().any(|line| line == "| x |   |"));
    }

    #[test]
    fn test_accent_for_is_stable_per_key() {
        // Arrange & Act
        let first = accent_for("Write report");
        let second = accent_for("Write report");

        // Assert
        assert_eq!(first, second);
        assert!(matches!(first, Tone::Accent(_)));
    }

    #[test]
    fn test_right_pad_trim_pads_short_text() {
        // Arrange & Act
        let fitted = right_pad_trim("abc", 6, false);

        // Assert
        assert_eq!(fitted, "abc   ");
    }

    #[test]
    fn test_right_pad_trim_cuts_long_text() {
        // Arrange & Act
        let cut = right_pad_trim("Write report", 8, false);
        let with_ellipsis = right_pad_trim("Write report", 8, true);

        // Assert
        assert_eq!(cut, "Write re");
        assert_eq!(with_ellipsis, "Write...");
    }

    #[test]
    fn test_right_pad_trim_counts_wide_characters() {
        // Arrange & Act
        let fitted = right_pad_trim("日本語", 5, false);

        // Assert
        assert_eq!(fitted, "日本 ");
        assert_eq!(fitted.width(), 5);
    }

    #[test]
    fn test_single_line_joins_lines_with_spaces() {
        // Arrange & Act
        let flattened = single_line("first line\nsecond   line\n");

        // Assert
        assert_eq!(flattened, "first line second line");
    }
}
