use ratatui::layout::{Position, Rect};
use unicode_width::UnicodeWidthStr;

use crate::domain::input::InputState;

/// Computes a rectangle of `width_percent` x `height_percent` centered in
/// `area`, never smaller than the given minimums unless `area` is.
pub fn centered_rect(
    area: Rect,
    width_percent: u16,
    height_percent: u16,
    min_size: (u16, u16),
) -> Rect {
    let (min_width, min_height) = min_size;
    let popup_width = (area.width * width_percent / 100).max(min_width);
    let popup_height = (area.height * height_percent / 100).max(min_height);

    let width = popup_width.min(area.width);
    let height = popup_height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width, height)
}

/// Terminal cell of `input`'s cursor when its text is drawn inside the
/// bordered `area`, clamped to the inner region.
pub fn input_cursor_position(input: &InputState, area: Rect) -> Position {
    let (line, _) = input.line_column();
    let line_text = input.text().split('\n').nth(line).unwrap_or_default();
    let line_start = input
        .text()
        .split('\n')
        .take(line)
        .map(|text| text.chars().count() + 1)
        .sum::<usize>();
    let column_chars = input.cursor.saturating_sub(line_start);
    let before_cursor: String = line_text.chars().take(column_chars).collect();

    let inner_right = area.right().saturating_sub(2);
    let inner_bottom = area.bottom().saturating_sub(2);
    let x = area
        .x
        .saturating_add(1)
        .saturating_add(u16::try_from(before_cursor.width()).unwrap_or(u16::MAX))
        .min(inner_right);
    let y = area
        .y
        .saturating_add(1)
        .saturating_add(u16::try_from(line).unwrap_or(u16::MAX))
        .min(inner_bottom);

    Position::new(x, y)
}
