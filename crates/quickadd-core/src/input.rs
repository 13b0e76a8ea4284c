use std::ops::Range;

/// Text buffer backing the quick-add field, with the caret kept on a char
/// boundary as a byte offset. The caret is what lets the matcher tell a
/// token still being typed apart from a finished one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.buffer[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.buffer.remove(self.cursor);
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn set(&mut self, text: String) {
        self.buffer = text;
        self.cursor = self.buffer.len();
    }

    /// Moves the caret to `pos`, clamped to the buffer. Positions inside a
    /// multi-byte char are ignored.
    pub fn set_cursor(&mut self, pos: usize) {
        let pos = pos.min(self.buffer.len());
        if self.buffer.is_char_boundary(pos) {
            self.cursor = pos;
        }
    }

    /// Replaces `range` with `text` and leaves the caret right after the
    /// inserted text. Used when an autocomplete candidate is accepted.
    /// Out-of-range or non-boundary ranges are ignored.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) {
        if range.start > range.end
            || range.end > self.buffer.len()
            || !self.buffer.is_char_boundary(range.start)
            || !self.buffer.is_char_boundary(range.end)
        {
            return;
        }
        let start = range.start;
        self.buffer.replace_range(range, text);
        self.cursor = start + text.len();
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let input = InputState::new();
        assert!(input.is_empty());
        assert_eq!(input.cursor_pos(), 0);
        assert_eq!(input.as_str(), "");
    }

    #[test]
    fn test_insert_str_advances_caret() {
        let mut input = InputState::new();
        input.insert_str("Buy milk");
        assert_eq!(input.as_str(), "Buy milk");
        assert_eq!(input.cursor_pos(), 8);

        input.insert_str(" #wo");
        assert_eq!(input.as_str(), "Buy milk #wo");
        assert_eq!(input.cursor_pos(), 12);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = InputState::new();
        input.insert_str("ac");
        input.set_cursor(1);
        input.insert_str("b");
        assert_eq!(input.as_str(), "abc");
        assert_eq!(input.cursor_pos(), 2);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = InputState::new();
        input.backspace();
        assert_eq!(input.as_str(), "");
        assert_eq!(input.cursor_pos(), 0);
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut input = InputState::new();
        input.insert_str("caf\u{00e9}");
        assert_eq!(input.cursor_pos(), 5);
        input.backspace();
        assert_eq!(input.as_str(), "caf");
        assert_eq!(input.cursor_pos(), 3);
    }

    #[test]
    fn test_set_cursor_clamps_and_respects_char_boundaries() {
        let mut input = InputState::new();
        input.insert_str("\u{00e9}b");
        input.set_cursor(10);
        assert_eq!(input.cursor_pos(), 3);
        input.set_cursor(1);
        assert_eq!(input.cursor_pos(), 3);
        input.set_cursor(2);
        assert_eq!(input.cursor_pos(), 2);
    }

    #[test]
    fn test_set_and_clear() {
        let mut input = InputState::new();
        input.set("hello".to_string());
        assert_eq!(input.cursor_pos(), 5);
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor_pos(), 0);
    }

    #[test]
    fn test_replace_range_moves_caret_after_insert() {
        let mut input = InputState::new();
        input.set("Call mom #fa".to_string());
        input.replace_range(9..12, "#Family ");
        assert_eq!(input.as_str(), "Call mom #Family ");
        assert_eq!(input.cursor_pos(), 17);
    }

    #[test]
    fn test_replace_range_out_of_bounds_is_ignored() {
        let mut input = InputState::new();
        input.set("abc".to_string());
        input.replace_range(2..10, "x");
        assert_eq!(input.as_str(), "abc");
        assert_eq!(input.cursor_pos(), 3);
    }

    #[test]
    fn test_replace_range_rejects_split_char() {
        let mut input = InputState::new();
        input.set("\u{00e9}x".to_string());
        input.replace_range(1..2, "y");
        assert_eq!(input.as_str(), "\u{00e9}x");
    }
}
