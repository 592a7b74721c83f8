use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use unicode_width::UnicodeWidthStr;

/// Single-line question editor backing the input box at the bottom of the
/// screen. The cursor is a byte offset into `text` and always sits on a char
/// boundary.
#[derive(Debug, Default)]
pub struct Composer {
    text: String,
    cursor: usize,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Display column of the cursor, for terminal cursor placement.
    pub fn cursor_col(&self) -> u16 {
        let col = UnicodeWidthStr::width(&self.text[..self.cursor]);
        col.min(u16::MAX as usize) as u16
    }

    /// Applies one key press. Returns true when the text changed, i.e. when
    /// the edit counts as a keystroke for the typing indicator.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    || key.modifiers.contains(KeyModifiers::ALT)
                {
                    return false;
                }
                self.insert(c);
                true
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                self.move_left();
                false
            }
            KeyCode::Right => {
                self.move_right();
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.text.len();
                false
            }
            _ => false,
        }
    }

    fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn backspace(&mut self) -> bool {
        let Some(prev) = self.text[..self.cursor].chars().next_back() else {
            return false;
        };
        self.cursor -= prev.len_utf8();
        self.text.remove(self.cursor);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.text.remove(self.cursor);
        true
    }

    fn move_left(&mut self) {
        if let Some(prev) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    fn move_right(&mut self) {
        if let Some(next) = self.text[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    fn press(composer: &mut Composer, code: KeyCode) -> bool {
        composer.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(composer: &mut Composer, s: &str) {
        for c in s.chars() {
            assert!(press(composer, KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_inserts_at_the_cursor() {
        let mut composer = Composer::new();
        type_str(&mut composer, "herld");
        press(&mut composer, KeyCode::Left);
        press(&mut composer, KeyCode::Left);
        press(&mut composer, KeyCode::Left);
        type_str(&mut composer, "llo wo");
        assert_eq!(composer.text(), "hello world");
    }

    #[test]
    fn backspace_and_delete_respect_char_boundaries() {
        let mut composer = Composer::new();
        type_str(&mut composer, "héllo");
        press(&mut composer, KeyCode::Home);
        press(&mut composer, KeyCode::Right);
        press(&mut composer, KeyCode::Right);
        assert!(press(&mut composer, KeyCode::Backspace));
        assert_eq!(composer.text(), "hllo");
        assert!(press(&mut composer, KeyCode::Delete));
        assert_eq!(composer.text(), "hlo");
    }

    #[test]
    fn backspace_on_empty_input_is_not_a_keystroke() {
        let mut composer = Composer::new();
        assert!(!press(&mut composer, KeyCode::Backspace));
        assert!(!press(&mut composer, KeyCode::Delete));
    }

    #[test]
    fn cursor_movement_is_not_a_keystroke() {
        let mut composer = Composer::new();
        type_str(&mut composer, "ab");
        assert!(!press(&mut composer, KeyCode::Left));
        assert!(!press(&mut composer, KeyCode::Right));
        assert!(!press(&mut composer, KeyCode::Home));
        assert!(!press(&mut composer, KeyCode::End));
        assert_eq!(composer.text(), "ab");
    }

    #[test]
    fn control_chords_are_ignored() {
        let mut composer = Composer::new();
        let changed =
            composer.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!changed);
        assert_eq!(composer.text(), "");
    }

    #[test]
    fn cursor_col_counts_display_width() {
        let mut composer = Composer::new();
        type_str(&mut composer, "日本");
        assert_eq!(composer.cursor_col(), 4);
        press(&mut composer, KeyCode::Left);
        assert_eq!(composer.cursor_col(), 2);
    }

    #[test]
    fn clear_resets_text_and_cursor() {
        let mut composer = Composer::new();
        type_str(&mut composer, "draft");
        composer.clear();
        assert!(composer.is_empty());
        assert_eq!(composer.cursor_col(), 0);
        type_str(&mut composer, "x");
        assert_eq!(composer.text(), "x");
    }
}
