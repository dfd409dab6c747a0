use std::cmp;

/// Single-line text input with a character cursor. All the dashboard's
/// text entry is one line, so there is no multi-line or undo machinery.
#[derive(Debug, Clone, Default)]
pub struct Input {
    chars: Vec<char>,
    cursor: usize,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(content: &str) -> Self {
        let chars: Vec<char> = content.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, ch: char) {
        let at = cmp::min(self.cursor, self.chars.len());
        self.chars.insert(at, ch);
        self.cursor = at + 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = cmp::min(self.cursor + 1, self.chars.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_at_cursor_position() {
        let mut input = Input::from_str("Mlk");
        input.move_left();
        input.move_left();
        input.insert_char('i');
        assert_eq!(input.value(), "Milk");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_and_delete_behave_around_cursor() {
        let mut input = Input::from_str("abc");
        input.backspace();
        assert_eq!(input.value(), "ab");
        input.move_home();
        input.delete();
        assert_eq!(input.value(), "b");
        input.backspace();
        assert_eq!(input.value(), "b");
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut input = Input::from_str("héllo");
        input.move_home();
        input.move_right();
        input.delete();
        assert_eq!(input.value(), "hllo");
    }
}
