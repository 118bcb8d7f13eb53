//! Single-line text input for naming new tasks.

use crossterm::event::KeyCode;

use super::keymap::KeyPress;

/// Maximum number of characters a task name may have.
pub const CHAR_LIMIT: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: Vec<char>,
    /// Cursor position in chars, 0..=value.len()
    cursor: usize,
    focused: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn reset(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns false if the key was not used.
    pub fn handle_key(&mut self, key: &KeyPress) -> bool {
        if !self.focused {
            return false;
        }

        if let Some(c) = key.printable() {
            if self.value.len() >= CHAR_LIMIT {
                return false;
            }
            self.value.insert(self.cursor, c);
            self.cursor += 1;
            return true;
        }

        match key.code {
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.value.remove(self.cursor);
            }
            KeyCode::Delete if self.cursor < self.value.len() => {
                self.value.remove(self.cursor);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::new();
        input.focus();
        for c in text.chars() {
            input.handle_key(&KeyPress::char(c));
        }
        input
    }

    #[test]
    fn test_typing_appends() {
        let input = typed("Focus");
        assert_eq!(input.value(), "Focus");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut input = TextInput::new();
        assert!(!input.handle_key(&KeyPress::char('a')));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_backspace_and_cursor_movement() {
        let mut input = typed("abc");
        input.handle_key(&KeyPress::new(KeyCode::Left));
        input.handle_key(&KeyPress::new(KeyCode::Backspace));
        assert_eq!(input.value(), "ac");

        input.handle_key(&KeyPress::new(KeyCode::Home));
        input.handle_key(&KeyPress::char('x'));
        assert_eq!(input.value(), "xac");

        input.handle_key(&KeyPress::new(KeyCode::Delete));
        assert_eq!(input.value(), "xc");

        input.handle_key(&KeyPress::new(KeyCode::End));
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_backspace_at_start_is_unused() {
        let mut input = typed("");
        assert!(!input.handle_key(&KeyPress::new(KeyCode::Backspace)));
    }

    #[test]
    fn test_control_chords_are_not_inserted() {
        let mut input = typed("a");
        assert!(!input.handle_key(&KeyPress::ctrl('u')));
        assert_eq!(input.value(), "a");
    }

    #[test]
    fn test_char_limit() {
        let input = typed(&"x".repeat(CHAR_LIMIT + 10));
        assert_eq!(input.value().chars().count(), CHAR_LIMIT);
    }

    #[test]
    fn test_reset_clears() {
        let mut input = typed("abc");
        input.reset();
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor(), 0);
        assert!(input.is_focused());
    }
}
