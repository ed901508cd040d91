use ropey::Rope;

use super::{EditorError, MarkdownSurface, SurfaceFactory};

/// Cursor position in character units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, counted in chars.
    pub col: usize,
    /// Column to return to when moving vertically through short lines.
    sticky_col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            sticky_col: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.sticky_col = col;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A single editing action coming from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEdit {
    Insert(char),
    Newline,
    Backspace,
    Delete,
    Move(Direction),
    Home,
    End,
}

/// Rope-backed markdown editing surface.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    scroll: usize,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            scroll: 0,
        }
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its line break.
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let text = self.rope.line(idx).to_string();
        Some(text.trim_end_matches(['\n', '\r']).to_string())
    }

    fn line_chars(&self, idx: usize) -> usize {
        self.line(idx).map_or(0, |l| l.chars().count())
    }

    /// Chars in the line break ending line `idx` (0, 1 or 2 for `\r\n`).
    fn break_len(&self, idx: usize) -> usize {
        self.rope.line(idx).len_chars() - self.line_chars(idx)
    }

    fn char_idx(&self) -> usize {
        self.rope.line_to_char(self.cursor.line) + self.cursor.col
    }

    /// Apply one edit. Returns `true` if the text changed.
    pub fn apply(&mut self, edit: EditorEdit) -> bool {
        match edit {
            EditorEdit::Insert(ch) => {
                self.rope.insert_char(self.char_idx(), ch);
                self.cursor.set_col(self.cursor.col + 1);
                true
            }
            EditorEdit::Newline => {
                self.rope.insert_char(self.char_idx(), '\n');
                self.cursor.line += 1;
                self.cursor.set_col(0);
                true
            }
            EditorEdit::Backspace => self.backspace(),
            EditorEdit::Delete => self.delete(),
            EditorEdit::Move(direction) => {
                self.move_cursor(direction);
                false
            }
            EditorEdit::Home => {
                self.cursor.set_col(0);
                false
            }
            EditorEdit::End => {
                self.cursor.set_col(self.line_chars(self.cursor.line));
                false
            }
        }
    }

    fn backspace(&mut self) -> bool {
        let idx = self.char_idx();
        if idx == 0 {
            return false;
        }
        let removed = if self.cursor.col == 0 {
            let prev = self.cursor.line - 1;
            let width = self.break_len(prev);
            self.cursor.line = prev;
            self.cursor.set_col(self.line_chars(prev));
            width
        } else {
            self.cursor.set_col(self.cursor.col - 1);
            1
        };
        self.rope.remove(idx - removed..idx);
        true
    }

    fn delete(&mut self) -> bool {
        let idx = self.char_idx();
        if idx >= self.rope.len_chars() {
            return false;
        }
        let removed = if self.cursor.col >= self.line_chars(self.cursor.line) {
            self.break_len(self.cursor.line).max(1)
        } else {
            1
        };
        self.rope.remove(idx..idx + removed);
        true
    }

    fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.cursor.col > 0 {
                    self.cursor.set_col(self.cursor.col - 1);
                } else if self.cursor.line > 0 {
                    self.cursor.line -= 1;
                    self.cursor.set_col(self.line_chars(self.cursor.line));
                }
            }
            Direction::Right => {
                if self.cursor.col < self.line_chars(self.cursor.line) {
                    self.cursor.set_col(self.cursor.col + 1);
                } else if self.cursor.line + 1 < self.line_count() {
                    self.cursor.line += 1;
                    self.cursor.set_col(0);
                }
            }
            Direction::Up if self.cursor.line > 0 => {
                self.cursor.line -= 1;
                self.cursor.col = self.cursor.sticky_col.min(self.line_chars(self.cursor.line));
            }
            Direction::Down if self.cursor.line + 1 < self.line_count() => {
                self.cursor.line += 1;
                self.cursor.col = self.cursor.sticky_col.min(self.line_chars(self.cursor.line));
            }
            Direction::Up | Direction::Down => {}
        }
    }

    /// Adjust the scroll offset so the cursor line is within `height` rows.
    pub const fn follow_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor.line < self.scroll {
            self.scroll = self.cursor.line;
        } else if self.cursor.line >= self.scroll + height {
            self.scroll = self.cursor.line + 1 - height;
        }
    }

    fn clamp_cursor(&mut self) {
        let last = self.line_count().saturating_sub(1);
        let line = self.cursor.line.min(last);
        let col = self.cursor.col.min(self.line_chars(line));
        self.cursor = Cursor::at(line, col);
        self.scroll = self.scroll.min(last);
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("lines", &self.rope.len_lines())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl MarkdownSurface for EditorBuffer {
    fn value(&self) -> String {
        self.rope.to_string()
    }

    fn set_value(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.clamp_cursor();
    }

    fn edit(&mut self, edit: EditorEdit) -> bool {
        self.apply(edit)
    }

    fn buffer(&self) -> Option<&EditorBuffer> {
        Some(self)
    }

    fn buffer_mut(&mut self) -> Option<&mut EditorBuffer> {
        Some(self)
    }
}

/// Creates [`EditorBuffer`] surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferFactory;

impl SurfaceFactory for BufferFactory {
    fn create(&self, initial: &str) -> Result<Box<dyn MarkdownSurface>, EditorError> {
        Ok(Box::new(EditorBuffer::from_text(initial)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(buf: &mut EditorBuffer, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                buf.apply(EditorEdit::Newline);
            } else {
                buf.apply(EditorEdit::Insert(ch));
            }
        }
    }

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::from_text("");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), Some(String::new()));
        assert_eq!(buf.line(1), None);
    }

    #[test]
    fn test_typing_builds_text() {
        let mut buf = EditorBuffer::from_text("");
        typed(&mut buf, "# Hi\nthere");
        assert_eq!(buf.value(), "# Hi\nthere");
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
    }

    #[test]
    fn test_multibyte_chars_use_char_columns() {
        let mut buf = EditorBuffer::from_text("");
        typed(&mut buf, "héllo");
        buf.apply(EditorEdit::Move(Direction::Left));
        buf.apply(EditorEdit::Move(Direction::Left));
        buf.apply(EditorEdit::Move(Direction::Left));
        buf.apply(EditorEdit::Backspace);
        assert_eq!(buf.value(), "hllo");
    }

    #[test]
    fn test_backspace_at_line_start_joins_lines() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.apply(EditorEdit::Move(Direction::Down));
        assert!(buf.apply(EditorEdit::Backspace));
        assert_eq!(buf.value(), "abcd");
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_backspace_joins_crlf_lines() {
        let mut buf = EditorBuffer::from_text("ab\r\ncd");
        buf.apply(EditorEdit::Move(Direction::Down));
        assert!(buf.apply(EditorEdit::Backspace));
        assert_eq!(buf.value(), "abcd");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_delete_at_line_end_removes_crlf() {
        let mut buf = EditorBuffer::from_text("ab\r\ncd\r\n");
        buf.apply(EditorEdit::End);
        assert!(buf.apply(EditorEdit::Delete));
        assert_eq!(buf.value(), "abcd\r\n");
        assert_eq!(buf.line_count(), 2);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buf = EditorBuffer::from_text("x");
        assert!(!buf.apply(EditorEdit::Backspace));
        assert_eq!(buf.value(), "x");
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("x");
        buf.apply(EditorEdit::End);
        assert!(!buf.apply(EditorEdit::Delete));
        buf.apply(EditorEdit::Home);
        assert!(buf.apply(EditorEdit::Delete));
        assert_eq!(buf.value(), "");
    }

    #[test]
    fn test_vertical_moves_remember_column() {
        let mut buf = EditorBuffer::from_text("long line\nab\nanother line");
        buf.apply(EditorEdit::End);
        buf.apply(EditorEdit::Move(Direction::Down));
        assert_eq!(buf.cursor().col, 2);
        buf.apply(EditorEdit::Move(Direction::Down));
        assert_eq!(buf.cursor().col, 9);
    }

    #[test]
    fn test_set_value_clamps_cursor() {
        let mut buf = EditorBuffer::from_text("one\ntwo\nthree");
        buf.apply(EditorEdit::Move(Direction::Down));
        buf.apply(EditorEdit::Move(Direction::Down));
        buf.apply(EditorEdit::End);
        buf.set_value("x");
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_follow_cursor_scrolls_window() {
        let mut buf = EditorBuffer::from_text("1\n2\n3\n4\n5\n6");
        for _ in 0..5 {
            buf.apply(EditorEdit::Move(Direction::Down));
        }
        buf.follow_cursor(3);
        assert_eq!(buf.scroll(), 3);
        for _ in 0..5 {
            buf.apply(EditorEdit::Move(Direction::Up));
        }
        buf.follow_cursor(3);
        assert_eq!(buf.scroll(), 0);
    }

    #[test]
    fn test_movement_does_not_modify() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        assert!(!buf.apply(EditorEdit::Move(Direction::Down)));
        assert!(!buf.apply(EditorEdit::End));
        assert!(buf.apply(EditorEdit::Insert('e')));
        assert_eq!(buf.value(), "ab\ncde");
    }
}
