/// Editable text field with a character-based cursor and an optional length
/// limit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    /// Cursor, counted in chars.
    pub cursor: usize,
    char_limit: Option<usize>,
    text: String,
}

impl InputState {
    /// Creates an empty input that accepts at most `char_limit` characters.
    pub fn with_char_limit(char_limit: usize) -> Self {
        Self {
            char_limit: Some(char_limit),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the buffer, truncating to the limit, and moves the cursor to
    /// the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = match self.char_limit {
            Some(limit) => text.chars().take(limit).collect(),
            None => text.to_string(),
        };
        self.cursor = self.char_count();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Typing past the limit is a no-op.
    pub fn insert_char(&mut self, ch: char) {
        if self
            .char_limit
            .is_some_and(|limit| self.char_count() >= limit)
        {
            return;
        }

        let byte_offset = self.byte_offset();
        self.text.insert(byte_offset, ch);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Backspace.
    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let start = self.byte_offset_at(self.cursor - 1);
        let end = self.byte_offset();
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    /// Delete.
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.char_count() {
            return;
        }

        let start = self.byte_offset();
        let end = self.byte_offset_at(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Returns the zero-based line and column of the cursor.
    pub fn line_column(&self) -> (usize, usize) {
        let mut line = 0;
        let mut column = 0;

        for (index, ch) in self.text.chars().enumerate() {
            if index == self.cursor {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }

        (line, column)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self) -> usize {
        self.byte_offset_at(self.cursor)
    }

    fn byte_offset_at(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(index, _)| index)
    }
}
