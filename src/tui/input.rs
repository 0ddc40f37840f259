//! Single-line text input for the board's search prompt.

/// A text input field with a cursor counted in characters.
#[derive(Clone, Default, Debug)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
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
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_text_at_cursor() {
        let mut f = InputField::new();
        for c in "café".chars() {
            f.handle_char(c);
        }
        f.move_cursor_left();
        f.handle_backspace();
        assert_eq!(f.value, "caé");
        f.handle_delete();
        assert_eq!(f.value, "ca");
        f.handle_char('t');
        assert_eq!(f.value, "cat");
        assert_eq!(f.cursor, 3);
    }

    #[test]
    fn clear_resets_cursor() {
        let mut f = InputField::new();
        f.handle_char('x');
        f.clear();
        assert!(f.is_empty());
        assert_eq!(f.cursor, 0);
        f.handle_backspace();
        f.move_cursor_left();
        assert_eq!(f.cursor, 0);
    }
}
