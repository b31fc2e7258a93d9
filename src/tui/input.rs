//! Input field handling for the terminal user interface.

use unicode_width::UnicodeWidthChar;

/// A single-line text input. The cursor counts characters, not bytes, so
/// Cyrillic and other multi-byte answers edit correctly.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// The slice of the value that fits in `width` terminal columns with the
    /// cursor in view, and the cursor's column inside that slice. Wide
    /// characters take two columns; text left of the view scrolls off.
    pub fn viewport(&self, width: usize) -> (String, usize) {
        let chars: Vec<char> = self.value.chars().collect();
        let cursor = self.cursor.min(chars.len());
        let room = width.saturating_sub(1);

        let mut start = cursor;
        let mut column = 0;
        while start > 0 {
            let w = chars[start - 1].width().unwrap_or(0);
            if column + w > room {
                break;
            }
            column += w;
            start -= 1;
        }

        let mut shown = String::new();
        let mut used = 0;
        for &c in &chars[start..] {
            let w = c.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            shown.push(c);
        }
        (shown, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputField {
        let mut field = InputField::new();
        text.chars().for_each(|c| field.handle_char(c));
        field
    }

    #[test]
    fn test_edits_multibyte_text() {
        let mut field = typed("Париж");
        field.move_cursor_left();
        field.handle_backspace();
        assert_eq!(field.value, "Парж");
        field.handle_char('и');
        assert_eq!(field.value, "Париж");
        field.handle_delete();
        assert_eq!(field.value, "Пари");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut field = typed("ab");
        field.move_cursor_right();
        assert_eq!(field.cursor, 2);
        field.move_home();
        field.move_cursor_left();
        assert_eq!(field.cursor, 0);
        field.handle_backspace();
        assert_eq!(field.value, "ab");
        field.move_end();
        field.handle_delete();
        assert_eq!(field.value, "ab");
        field.clear();
        assert_eq!((field.value.as_str(), field.cursor), ("", 0));
    }

    #[test]
    fn test_viewport_counts_display_columns() {
        assert_eq!(typed("漢字").viewport(10), ("漢字".to_string(), 4));
        assert_eq!(typed("🙂a").viewport(10), ("🙂a".to_string(), 3));

        let mut field = typed("Москва");
        field.move_home();
        field.move_cursor_right();
        assert_eq!(field.viewport(10), ("Москва".to_string(), 1));
    }

    #[test]
    fn test_viewport_scrolls_long_answers() {
        let mut field = typed("abcdefghij");
        assert_eq!(field.viewport(5), ("ghij".to_string(), 4));

        field.move_home();
        assert_eq!(field.viewport(5), ("abcde".to_string(), 0));

        let field = typed("一二三四五");
        assert_eq!(field.viewport(6), ("四五".to_string(), 4));
        assert_eq!(field.viewport(0), (String::new(), 0));
    }
}
